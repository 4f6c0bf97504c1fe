use axum::{Router, extract::State, http::StatusCode, routing::get, routing::post};

use taskwheel_core::health::healthz;
use taskwheel_core::middleware::{request_id_layer, trace_layer};

use crate::handlers::{
    license::{issue_trial, verify_license},
    webhook::purchase_webhook,
};
use crate::state::AppState;

/// Readiness: the service is ready when its database answers.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // License
        .route("/license/verify", post(verify_license))
        .route("/license/trial", post(issue_trial))
        .route("/license/webhook", post(purchase_webhook))
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
