use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// License service error variants.
///
/// `InvalidCode` and `DeviceMismatch` are terminal — surfaced verbatim, never
/// retried. Storage and transport faults collapse into `Internal` and are
/// reported with a generic message so the client fails closed instead of
/// inferring anything from the details.
#[derive(Debug, thiserror::Error)]
pub enum LicenseServiceError {
    #[error("Code and device ID are required.")]
    InvalidInput,
    #[error("Invalid license key")]
    InvalidCode,
    #[error("License already in use on another device.")]
    DeviceMismatch,
    #[error("Trial already used on this device.")]
    TrialAlreadyUsed,
    #[error("License code already exists.")]
    DuplicateCode,
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl LicenseServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidCode => "INVALID_CODE",
            Self::DeviceMismatch => "DEVICE_MISMATCH",
            Self::TrialAlreadyUsed => "TRIAL_ALREADY_USED",
            Self::DuplicateCode => "DUPLICATE_CODE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for LicenseServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput | Self::InvalidCode => StatusCode::BAD_REQUEST,
            Self::DeviceMismatch | Self::TrialAlreadyUsed => StatusCode::FORBIDDEN,
            Self::DuplicateCode => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
