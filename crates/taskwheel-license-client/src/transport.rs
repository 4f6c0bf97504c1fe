#![allow(async_fn_in_trait)]

use serde::Deserialize;
use serde_json::json;

/// Wire reply from `POST /license/verify`. Failure replies reuse the same
/// shape with `success: false` and an optional `status` ("expired" tells the
/// client to purge its cached code).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReply {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub hours_remaining: Option<i64>,
    pub status: Option<String>,
    pub message: Option<String>,
}

/// Wire reply from `POST /license/trial`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrialReply {
    pub success: bool,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Port to the license service. The session fails closed on any `Err` —
/// an unreachable server never upgrades access.
pub trait VerifyTransport {
    async fn verify(&self, code: &str, device_id: &str) -> anyhow::Result<VerifyReply>;
    async fn issue_trial(&self, device_id: &str) -> anyhow::Result<TrialReply>;
}

/// HTTP transport talking to a deployed license service.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl VerifyTransport for HttpTransport {
    async fn verify(&self, code: &str, device_id: &str) -> anyhow::Result<VerifyReply> {
        // Error statuses carry the same JSON shape, so the body is decoded
        // regardless of the HTTP status code.
        let reply = self
            .client
            .post(format!("{}/license/verify", self.base_url))
            .json(&json!({ "code": code, "deviceId": device_id }))
            .send()
            .await?
            .json::<VerifyReply>()
            .await?;
        Ok(reply)
    }

    async fn issue_trial(&self, device_id: &str) -> anyhow::Result<TrialReply> {
        let reply = self
            .client
            .post(format!("{}/license/trial", self.base_url))
            .json(&json!({ "deviceId": device_id }))
            .send()
            .await?
            .json::<TrialReply>()
            .await?;
        Ok(reply)
    }
}
