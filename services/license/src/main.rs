use sea_orm::Database;
use tracing::info;

use taskwheel_core::tracing::init_tracing;
use taskwheel_license::config::LicenseConfig;
use taskwheel_license::infra::authority::HttpLicenseAuthority;
use taskwheel_license::router::build_router;
use taskwheel_license::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = LicenseConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let authority = HttpLicenseAuthority::new(
        reqwest::Client::new(),
        config.authority_url.clone(),
        config.authority_product_id.clone(),
    );

    let state = AppState { db, authority };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.license_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("license service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
