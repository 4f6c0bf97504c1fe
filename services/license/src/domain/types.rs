use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Access tier granted by a license record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseType {
    Trial,
    Full,
    Dev,
}

impl LicenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Trial => "trial",
            LicenseType::Full => "full",
            LicenseType::Dev => "dev",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(LicenseType::Trial),
            "full" => Some(LicenseType::Full),
            "dev" => Some(LicenseType::Dev),
            _ => None,
        }
    }
}

/// A durable license record, keyed by activation code.
#[derive(Debug, Clone)]
pub struct LicenseRecord {
    pub id: Uuid,
    pub code: String,
    pub kind: LicenseType,
    /// Device the code is bound to; `None` means unclaimed.
    pub device_id: Option<String>,
    /// `None` means "not yet set" (trial, pre-activation) or "never expires" (full).
    pub expires_at: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a verification call. Computed per call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Trial { hours_remaining: i64 },
    Full,
    Dev,
    /// Trial past its expiry. A decision, not an error — the client purges
    /// its cached code on receipt.
    Expired,
}

/// Trial lifetime, counted from first activation.
pub const TRIAL_DURATION_HOURS: i64 = 48;

/// Issued trial codes look like `TRIAL-XXXXXXXX`.
pub const TRIAL_CODE_PREFIX: &str = "TRIAL-";

/// Random suffix length of an issued trial code.
pub const TRIAL_CODE_LEN: usize = 8;
