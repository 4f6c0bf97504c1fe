use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use taskwheel_license::domain::repository::{LicenseAuthority, LicenseRepository};
use taskwheel_license::domain::types::{LicenseRecord, LicenseType};
use taskwheel_license::error::LicenseServiceError;

// ── MockAuthority ────────────────────────────────────────────────────────────

pub struct MockAuthority {
    pub valid_codes: Vec<String>,
    pub fail: bool,
    calls: Arc<Mutex<u32>>,
}

impl MockAuthority {
    pub fn with_valid_codes(codes: &[&str]) -> Self {
        Self {
            valid_codes: codes.iter().map(|c| (*c).to_owned()).collect(),
            fail: false,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// No product configured: every check reports "not validated".
    pub fn unconfigured() -> Self {
        Self::with_valid_codes(&[])
    }

    pub fn failing() -> Self {
        Self {
            valid_codes: vec![],
            fail: true,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls_handle(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.calls)
    }
}

impl LicenseAuthority for MockAuthority {
    async fn check_purchase(&self, code: &str) -> Result<bool, LicenseServiceError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(LicenseServiceError::Internal(anyhow::anyhow!(
                "authority down"
            )));
        }
        Ok(self.valid_codes.iter().any(|c| c == code))
    }
}

// ── MockLicenseRepo ──────────────────────────────────────────────────────────

pub struct MockLicenseRepo {
    records: Arc<Mutex<Vec<LicenseRecord>>>,
    /// When set, the record is bound to this device right before the next
    /// conditional claim runs — simulates losing the claim race.
    steal_claim: Mutex<Option<String>>,
    /// Force the next N inserts to report a code collision.
    forced_duplicates: Mutex<u32>,
}

impl MockLicenseRepo {
    pub fn new(records: Vec<LicenseRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            steal_claim: Mutex::new(None),
            forced_duplicates: Mutex::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn steal_claim(self, device_id: &str) -> Self {
        *self.steal_claim.lock().unwrap() = Some(device_id.to_owned());
        self
    }

    pub fn force_duplicate_inserts(self, n: u32) -> Self {
        *self.forced_duplicates.lock().unwrap() = n;
        self
    }

    /// Shared handle to the record list for post-execution inspection.
    pub fn records_handle(&self) -> Arc<Mutex<Vec<LicenseRecord>>> {
        Arc::clone(&self.records)
    }
}

impl LicenseRepository for MockLicenseRepo {
    async fn find_by_code(&self, code: &str) -> Result<Option<LicenseRecord>, LicenseServiceError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.code == code)
            .cloned())
    }

    async fn find_trial_by_device(
        &self,
        device_id: &str,
    ) -> Result<Option<LicenseRecord>, LicenseServiceError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.device_id.as_deref() == Some(device_id) && r.kind == LicenseType::Trial)
            .cloned())
    }

    async fn claim_device(
        &self,
        id: Uuid,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, LicenseServiceError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LicenseServiceError::Internal(anyhow::anyhow!("no such record")))?;

        if let Some(stealer) = self.steal_claim.lock().unwrap().take() {
            record.device_id = Some(stealer);
            record.activated_at = Some(now);
        }

        // Conditional update: only an unclaimed record can be won.
        if record.device_id.is_none() {
            record.device_id = Some(device_id.to_owned());
            record.activated_at = Some(now);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn stamp_trial_expiry(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, LicenseServiceError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LicenseServiceError::Internal(anyhow::anyhow!("no such record")))?;

        if record.expires_at.is_none() {
            record.expires_at = Some(expires_at);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn insert(&self, record: &LicenseRecord) -> Result<(), LicenseServiceError> {
        {
            let mut forced = self.forced_duplicates.lock().unwrap();
            if *forced > 0 {
                *forced -= 1;
                return Err(LicenseServiceError::DuplicateCode);
            }
        }
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.code == record.code) {
            return Err(LicenseServiceError::DuplicateCode);
        }
        records.push(record.clone());
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn full_record(code: &str) -> LicenseRecord {
    LicenseRecord {
        id: Uuid::new_v4(),
        code: code.to_owned(),
        kind: LicenseType::Full,
        device_id: None,
        expires_at: None,
        activated_at: None,
        email: Some("buyer@example.com".to_owned()),
        created_at: Utc::now(),
    }
}

pub fn dev_record(code: &str) -> LicenseRecord {
    LicenseRecord {
        kind: LicenseType::Dev,
        email: None,
        ..full_record(code)
    }
}

pub fn trial_record(
    code: &str,
    device_id: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) -> LicenseRecord {
    LicenseRecord {
        id: Uuid::new_v4(),
        code: code.to_owned(),
        kind: LicenseType::Trial,
        device_id: device_id.map(str::to_owned),
        expires_at,
        activated_at: device_id.map(|_| Utc::now()),
        email: None,
        created_at: Utc::now(),
    }
}

pub const DEVICE_A: &str = "11111111-1111-4111-8111-111111111111";
pub const DEVICE_B: &str = "22222222-2222-4222-8222-222222222222";
