#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::LicenseRecord;
use crate::error::LicenseServiceError;

/// Port for the third-party purchase authority.
pub trait LicenseAuthority: Send + Sync {
    /// Check whether `code` is a valid purchase with the external authority.
    ///
    /// Best-effort by contract: "not configured" reports `false`, and
    /// implementations are expected to swallow transport faults into `false`
    /// rather than failing the verification. An `Err` from an implementation
    /// is still treated as inconclusive by the engine.
    async fn check_purchase(&self, code: &str) -> Result<bool, LicenseServiceError>;
}

/// Repository for license records.
pub trait LicenseRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<LicenseRecord>, LicenseServiceError>;

    /// Find an existing trial record bound to `device_id` (one trial per device).
    async fn find_trial_by_device(
        &self,
        device_id: &str,
    ) -> Result<Option<LicenseRecord>, LicenseServiceError>;

    /// Claim the record for a device: set `device_id` and `activated_at`
    /// only where `device_id` is currently null, as a single conditional
    /// update. Returns `true` if this call won the claim.
    async fn claim_device(
        &self,
        id: Uuid,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, LicenseServiceError>;

    /// One-time trial expiry stamp: set `expires_at` only where currently
    /// null. Returns `true` if this call performed the stamp; `false` means a
    /// concurrent activation already set it.
    async fn stamp_trial_expiry(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, LicenseServiceError>;

    /// Insert a new record. A `code` collision surfaces as
    /// [`LicenseServiceError::DuplicateCode`].
    async fn insert(&self, record: &LicenseRecord) -> Result<(), LicenseServiceError>;
}
