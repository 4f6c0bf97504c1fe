use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::domain::types::AccessDecision;
use crate::error::LicenseServiceError;
use crate::state::AppState;
use crate::usecase::trial::{IssueTrialInput, IssueTrialUseCase};
use crate::usecase::verify::{VerifyLicenseInput, VerifyLicenseUseCase};

// ── POST /license/verify ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLicenseRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub device_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyLicenseResponse {
    pub success: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl VerifyLicenseResponse {
    fn granted(kind: &'static str, hours_remaining: Option<i64>) -> Self {
        Self {
            success: true,
            kind: Some(kind),
            hours_remaining,
            status: None,
            message: None,
        }
    }

    // Expired is a decision, not an error: HTTP 200, and `status` tells the
    // client to purge its cached code.
    fn expired() -> Self {
        Self {
            success: false,
            kind: None,
            hours_remaining: None,
            status: Some("expired"),
            message: Some("Trial has ended."),
        }
    }
}

pub async fn verify_license(
    State(state): State<AppState>,
    Json(body): Json<VerifyLicenseRequest>,
) -> Result<impl IntoResponse, LicenseServiceError> {
    let usecase = VerifyLicenseUseCase {
        authority: state.authority(),
        licenses: state.license_repo(),
    };

    let decision = usecase
        .execute(VerifyLicenseInput {
            code: body.code,
            device_id: body.device_id,
        })
        .await?;

    let response = match decision {
        AccessDecision::Trial { hours_remaining } => {
            VerifyLicenseResponse::granted("trial", Some(hours_remaining))
        }
        AccessDecision::Full => VerifyLicenseResponse::granted("full", None),
        AccessDecision::Dev => VerifyLicenseResponse::granted("dev", None),
        AccessDecision::Expired => VerifyLicenseResponse::expired(),
    };

    Ok((StatusCode::OK, Json(response)))
}

// ── POST /license/trial ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTrialRequest {
    #[serde(default)]
    pub device_id: String,
}

#[derive(Serialize)]
pub struct IssueTrialResponse {
    pub success: bool,
    pub code: String,
}

pub async fn issue_trial(
    State(state): State<AppState>,
    Json(body): Json<IssueTrialRequest>,
) -> Result<impl IntoResponse, LicenseServiceError> {
    let usecase = IssueTrialUseCase {
        licenses: state.license_repo(),
    };

    let out = usecase
        .execute(IssueTrialInput {
            device_id: body.device_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueTrialResponse {
            success: true,
            code: out.code,
        }),
    ))
}
