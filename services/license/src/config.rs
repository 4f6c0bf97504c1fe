/// License service configuration loaded from environment variables.
#[derive(Debug)]
pub struct LicenseConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `LICENSE_PORT`.
    pub license_port: u16,
    /// External authority verification endpoint. Env var: `AUTHORITY_URL`.
    pub authority_url: String,
    /// Product identifier registered with the external authority. Unset
    /// disables the authority strategy entirely. Env var: `AUTHORITY_PRODUCT_ID`.
    pub authority_product_id: Option<String>,
}

const DEFAULT_AUTHORITY_URL: &str = "https://api.gumroad.com/v2/licenses/verify";

impl LicenseConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            license_port: std::env::var("LICENSE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
            authority_url: std::env::var("AUTHORITY_URL")
                .unwrap_or_else(|_| DEFAULT_AUTHORITY_URL.to_owned()),
            authority_product_id: std::env::var("AUTHORITY_PRODUCT_ID").ok(),
        }
    }
}
