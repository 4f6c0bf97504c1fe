use chrono::{Duration, Utc};

use taskwheel_license::domain::types::{LicenseType, TRIAL_CODE_LEN, TRIAL_CODE_PREFIX};
use taskwheel_license::error::LicenseServiceError;
use taskwheel_license::usecase::trial::{IssueTrialInput, IssueTrialUseCase};

use crate::helpers::{DEVICE_A, MockLicenseRepo, trial_record};

fn input(device_id: &str) -> IssueTrialInput {
    IssueTrialInput {
        device_id: device_id.to_owned(),
    }
}

#[tokio::test]
async fn should_issue_code_pre_bound_to_device() {
    let repo = MockLicenseRepo::empty();
    let records = repo.records_handle();

    let uc = IssueTrialUseCase { licenses: repo };

    let before = Utc::now();
    let out = uc.execute(input(DEVICE_A)).await.unwrap();

    assert!(out.code.starts_with(TRIAL_CODE_PREFIX));
    assert_eq!(out.code.len(), TRIAL_CODE_PREFIX.len() + TRIAL_CODE_LEN);

    // Issuance binds the device and stamps the expiry up front.
    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.kind, LicenseType::Trial);
    assert_eq!(record.device_id.as_deref(), Some(DEVICE_A));
    assert!(record.activated_at.is_some());
    let expires_at = record.expires_at.expect("expiry set at issuance");
    assert!(expires_at >= before + Duration::hours(48));
    assert!(expires_at <= Utc::now() + Duration::hours(48));
}

#[tokio::test]
async fn should_reject_second_trial_for_same_device() {
    let repo = MockLicenseRepo::new(vec![trial_record(
        "TRIAL-USED0000",
        Some(DEVICE_A),
        Some(Utc::now() - Duration::hours(1)),
    )]);

    let uc = IssueTrialUseCase { licenses: repo };

    let result = uc.execute(input(DEVICE_A)).await;
    assert!(
        matches!(result, Err(LicenseServiceError::TrialAlreadyUsed)),
        "expected TrialAlreadyUsed, got {result:?}"
    );
}

#[tokio::test]
async fn should_retry_once_on_code_collision() {
    let repo = MockLicenseRepo::empty().force_duplicate_inserts(1);
    let records = repo.records_handle();

    let uc = IssueTrialUseCase { licenses: repo };

    let out = uc.execute(input(DEVICE_A)).await.unwrap();
    assert!(out.code.starts_with(TRIAL_CODE_PREFIX));
    assert_eq!(records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_give_up_after_second_collision() {
    let repo = MockLicenseRepo::empty().force_duplicate_inserts(2);

    let uc = IssueTrialUseCase { licenses: repo };

    let result = uc.execute(input(DEVICE_A)).await;
    assert!(
        matches!(result, Err(LicenseServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_blank_device_id() {
    let uc = IssueTrialUseCase {
        licenses: MockLicenseRepo::empty(),
    };

    let result = uc.execute(input("   ")).await;
    assert!(matches!(result, Err(LicenseServiceError::InvalidInput)));
}
