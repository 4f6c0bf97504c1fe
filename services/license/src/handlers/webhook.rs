use axum::{
    Json,
    extract::{Form, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::repository::LicenseRepository;
use crate::domain::types::{LicenseRecord, LicenseType};
use crate::error::LicenseServiceError;
use crate::state::AppState;

// ── POST /license/webhook ─────────────────────────────────────────────────────

/// Purchase notification from the payment provider, form-encoded.
#[derive(Deserialize)]
pub struct PurchaseWebhookRequest {
    pub license_key: Option<String>,
    pub email: Option<String>,
    /// Product permalink; informational, not validated here.
    pub permalink: Option<String>,
}

#[derive(Serialize)]
pub struct PurchaseWebhookResponse {
    pub success: bool,
}

/// Insert an unbound full license for a completed purchase. The device is
/// claimed later, on the buyer's first verification.
pub async fn purchase_webhook(
    State(state): State<AppState>,
    Form(body): Form<PurchaseWebhookRequest>,
) -> Result<impl IntoResponse, LicenseServiceError> {
    let code = body
        .license_key
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(LicenseServiceError::InvalidInput)?;

    let record = LicenseRecord {
        id: Uuid::new_v4(),
        code: code.to_owned(),
        kind: LicenseType::Full,
        device_id: None,
        expires_at: None,
        activated_at: None,
        email: body.email.clone(),
        created_at: Utc::now(),
    };

    match state.license_repo().insert(&record).await {
        Ok(()) => {
            tracing::info!(code, "purchase recorded");
        }
        // The provider retries webhooks; a redelivered purchase is not an error.
        Err(LicenseServiceError::DuplicateCode) => {
            tracing::warn!(code, "duplicate purchase webhook ignored");
        }
        Err(e) => return Err(e),
    }

    Ok((
        StatusCode::OK,
        Json(PurchaseWebhookResponse { success: true }),
    ))
}
