use chrono::{DateTime, Duration, Utc};

use crate::domain::repository::{LicenseAuthority, LicenseRepository};
use crate::domain::types::{AccessDecision, LicenseRecord, LicenseType, TRIAL_DURATION_HOURS};
use crate::error::LicenseServiceError;

/// Outcome of a single verification strategy.
///
/// Strategies run in a fixed order; the engine short-circuits on the first
/// verdict that is not `Inconclusive`. A strategy that cannot recognize the
/// code (authority says no / record not found) is inconclusive rather than a
/// rejection, so a later strategy still gets its turn.
enum Verdict {
    Granted(AccessDecision),
    Rejected(LicenseServiceError),
    Inconclusive,
}

pub struct VerifyLicenseInput {
    pub code: String,
    pub device_id: String,
}

pub struct VerifyLicenseUseCase<A, R>
where
    A: LicenseAuthority,
    R: LicenseRepository,
{
    pub authority: A,
    pub licenses: R,
}

impl<A, R> VerifyLicenseUseCase<A, R>
where
    A: LicenseAuthority,
    R: LicenseRepository,
{
    pub async fn execute(
        &self,
        input: VerifyLicenseInput,
    ) -> Result<AccessDecision, LicenseServiceError> {
        let code = input.code.trim();
        let device_id = input.device_id.trim();
        if code.is_empty() || device_id.is_empty() {
            return Err(LicenseServiceError::InvalidInput);
        }

        // Strategy 1: external purchase authority. Grants `full` with no
        // store mutation and no device lock — the authority does not expose
        // device identity, so locking cannot be enforced on this path.
        match self.authority_verdict(code).await {
            Verdict::Granted(decision) => return Ok(decision),
            Verdict::Rejected(err) => return Err(err),
            Verdict::Inconclusive => {}
        }

        // Strategy 2: the license store (trial / full / dev records).
        match self.store_verdict(code, device_id).await? {
            Verdict::Granted(decision) => return Ok(decision),
            Verdict::Rejected(err) => return Err(err),
            Verdict::Inconclusive => {}
        }

        // No strategy recognized the code.
        Err(LicenseServiceError::InvalidCode)
    }

    async fn authority_verdict(&self, code: &str) -> Verdict {
        match self.authority.check_purchase(code).await {
            Ok(true) => {
                tracing::info!(code, "license verified by external authority");
                Verdict::Granted(AccessDecision::Full)
            }
            Ok(false) => Verdict::Inconclusive,
            // The authority is best-effort and must never fail the overall
            // verification; an error here just hands over to the store.
            Err(e) => {
                tracing::warn!(error = %e, "authority check failed, falling back to store");
                Verdict::Inconclusive
            }
        }
    }

    async fn store_verdict(
        &self,
        code: &str,
        device_id: &str,
    ) -> Result<Verdict, LicenseServiceError> {
        let Some(mut record) = self.licenses.find_by_code(code).await? else {
            return Ok(Verdict::Inconclusive);
        };

        let now = Utc::now();

        // Device lock. The claim is a conditional update ("set device_id only
        // where null") so two concurrent first activations cannot both win.
        match record.device_id.as_deref() {
            None => {
                if self.licenses.claim_device(record.id, device_id, now).await? {
                    tracing::info!(code, device_id, "license claimed by device");
                    record.device_id = Some(device_id.to_owned());
                    record.activated_at = Some(now);
                } else {
                    // Lost the claim race: re-read to see who won.
                    let Some(current) = self.licenses.find_by_code(code).await? else {
                        return Ok(Verdict::Inconclusive);
                    };
                    if current.device_id.as_deref() != Some(device_id) {
                        tracing::warn!(code, device_id, "device mismatch after claim race");
                        return Ok(Verdict::Rejected(LicenseServiceError::DeviceMismatch));
                    }
                    record = current;
                }
            }
            Some(bound) if bound != device_id => {
                tracing::warn!(code, device_id, bound, "device mismatch");
                return Ok(Verdict::Rejected(LicenseServiceError::DeviceMismatch));
            }
            // Same device re-verifying.
            Some(_) => {}
        }

        match record.kind {
            LicenseType::Trial => self.trial_verdict(&record, now).await,
            LicenseType::Full => Ok(Verdict::Granted(AccessDecision::Full)),
            LicenseType::Dev => Ok(Verdict::Granted(AccessDecision::Dev)),
        }
    }

    async fn trial_verdict(
        &self,
        record: &LicenseRecord,
        now: DateTime<Utc>,
    ) -> Result<Verdict, LicenseServiceError> {
        let expires_at = match record.expires_at {
            Some(at) => at,
            // First activation in progress: stamp expiry exactly once.
            None => {
                let expiry = now + Duration::hours(TRIAL_DURATION_HOURS);
                if self.licenses.stamp_trial_expiry(record.id, expiry).await? {
                    tracing::info!(code = %record.code, %expiry, "trial expiry stamped");
                    expiry
                } else {
                    // A concurrent activation stamped it first; use theirs.
                    self.licenses
                        .find_by_code(&record.code)
                        .await?
                        .and_then(|r| r.expires_at)
                        .unwrap_or(expiry)
                }
            }
        };

        if now > expires_at {
            tracing::info!(code = %record.code, %expires_at, "trial expired");
            return Ok(Verdict::Granted(AccessDecision::Expired));
        }

        Ok(Verdict::Granted(AccessDecision::Trial {
            hours_remaining: hours_remaining(expires_at, now),
        }))
    }
}

/// Hours until `expires_at`, rounded up. Shown in the client's trial banner.
fn hours_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (expires_at - now).num_seconds();
    (secs + 3599) / 3600
}
