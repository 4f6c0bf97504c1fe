use serde_json::Value;

use crate::domain::repository::LicenseAuthority;
use crate::error::LicenseServiceError;

/// Purchase-verification client for the external license authority.
///
/// The authority speaks a form-encoded protocol: `product_id` + `license_key`
/// in, a JSON body with a `success` boolean out. Everything that goes wrong
/// on the way — transport fault, non-JSON body, missing field — collapses to
/// "not validated" so the engine can fall through to the store.
#[derive(Clone)]
pub struct HttpLicenseAuthority {
    client: reqwest::Client,
    url: String,
    product_id: Option<String>,
}

impl HttpLicenseAuthority {
    pub fn new(client: reqwest::Client, url: String, product_id: Option<String>) -> Self {
        Self {
            client,
            url,
            product_id,
        }
    }
}

impl LicenseAuthority for HttpLicenseAuthority {
    async fn check_purchase(&self, code: &str) -> Result<bool, LicenseServiceError> {
        // No product id configured: the authority path is disabled.
        let Some(product_id) = self.product_id.as_deref() else {
            return Ok(false);
        };

        let params = [
            ("product_id", product_id),
            ("license_key", code),
            ("increment_uses_count", "false"),
        ];

        let response = match self.client.post(&self.url).form(&params).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "authority request failed");
                return Ok(false);
            }
        };

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "authority response was not JSON");
                return Ok(false);
            }
        };

        Ok(body.get("success").and_then(Value::as_bool).unwrap_or(false))
    }
}
