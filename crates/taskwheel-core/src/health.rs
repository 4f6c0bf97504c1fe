use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
///
/// Readiness is service-specific (the license service pings its database),
/// so each service wires its own `/readyz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
