use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::LicenseRepository;
use crate::domain::types::{
    LicenseRecord, LicenseType, TRIAL_CODE_LEN, TRIAL_CODE_PREFIX, TRIAL_DURATION_HOURS,
};
use crate::error::LicenseServiceError;

/// Charset for the random trial code suffix (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_trial_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..TRIAL_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("{TRIAL_CODE_PREFIX}{suffix}")
}

pub struct IssueTrialInput {
    pub device_id: String,
}

#[derive(Debug)]
pub struct IssueTrialOutput {
    pub code: String,
}

pub struct IssueTrialUseCase<R>
where
    R: LicenseRepository,
{
    pub licenses: R,
}

impl<R> IssueTrialUseCase<R>
where
    R: LicenseRepository,
{
    pub async fn execute(
        &self,
        input: IssueTrialInput,
    ) -> Result<IssueTrialOutput, LicenseServiceError> {
        let device_id = input.device_id.trim();
        if device_id.is_empty() {
            return Err(LicenseServiceError::InvalidInput);
        }

        // One trial per device.
        if self
            .licenses
            .find_trial_by_device(device_id)
            .await?
            .is_some()
        {
            return Err(LicenseServiceError::TrialAlreadyUsed);
        }

        // Unlike verify-time first activation, issuance binds the device and
        // stamps the expiry up front.
        let now = Utc::now();

        // One retry on a store-level code collision.
        for attempt in 0..2 {
            let code = generate_trial_code();
            let record = LicenseRecord {
                id: Uuid::new_v4(),
                code: code.clone(),
                kind: LicenseType::Trial,
                device_id: Some(device_id.to_owned()),
                expires_at: Some(now + Duration::hours(TRIAL_DURATION_HOURS)),
                activated_at: Some(now),
                email: None,
                created_at: now,
            };

            match self.licenses.insert(&record).await {
                Ok(()) => {
                    tracing::info!(code = %record.code, device_id, "trial issued");
                    return Ok(IssueTrialOutput { code });
                }
                Err(LicenseServiceError::DuplicateCode) if attempt == 0 => {
                    tracing::warn!(code = %record.code, "trial code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(LicenseServiceError::Internal(anyhow::anyhow!(
            "trial code collision persisted after retry"
        )))
    }
}
