use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::device;
use crate::transport::{VerifyReply, VerifyTransport};

/// Gating state exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No verification attempted yet this session.
    Loading,
    /// Soft lock / limited mode.
    Locked,
    Trial { hours_remaining: i64 },
    Full,
    Dev,
}

/// Result of an activation attempt, for display in the unlock dialog.
#[derive(Debug, Clone)]
pub struct ActivationOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl ActivationOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
        }
    }

    fn unreachable() -> Self {
        Self::failed(Some("Could not reach the license server.".to_owned()))
    }
}

/// Client-side license session.
///
/// Persists exactly two strings under `data_dir`: the device id and the
/// activation code. Neither is trusted for access — the server re-derives the
/// decision on every check, so tampering with the cache cannot forge access.
pub struct LicenseSession<T>
where
    T: VerifyTransport,
{
    transport: T,
    code_path: PathBuf,
    device_id: String,
    status: SessionStatus,
}

impl<T> LicenseSession<T>
where
    T: VerifyTransport,
{
    pub fn new(transport: T, data_dir: &Path) -> io::Result<Self> {
        let device_id = device::get_or_create(&data_dir.join("device_id"))?;
        let status = if cfg!(feature = "dev-unlock") {
            SessionStatus::Dev
        } else {
            SessionStatus::Loading
        };
        Ok(Self {
            transport,
            code_path: data_dir.join("license_code"),
            device_id,
            status,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn trial_hours_remaining(&self) -> Option<i64> {
        match self.status {
            SessionStatus::Trial { hours_remaining } => Some(hours_remaining),
            _ => None,
        }
    }

    /// Re-derive the gating status. With no cached code this is a local soft
    /// lock and makes no network call. A cached code is never trusted
    /// blindly — it is re-verified remotely before access is granted.
    pub async fn refresh(&mut self) -> SessionStatus {
        if cfg!(feature = "dev-unlock") {
            return self.status;
        }

        let Some(code) = self.cached_code() else {
            self.status = SessionStatus::Locked;
            return self.status;
        };

        match self.transport.verify(&code, &self.device_id).await {
            Ok(reply) if reply.success => self.status = granted_status(&reply),
            Ok(reply) => {
                if is_expired(&reply) {
                    self.clear_code();
                }
                self.status = SessionStatus::Locked;
            }
            // Fail closed: an ambiguous fault never upgrades access, and the
            // cached code is kept for the next attempt.
            Err(e) => {
                tracing::warn!(error = %e, "verification unreachable, staying locked");
                self.status = SessionStatus::Locked;
            }
        }
        self.status
    }

    /// Verify `code` remotely; on success persist it as the cached code and
    /// update the status. An `expired` reply purges the cached code.
    pub async fn activate(&mut self, code: &str) -> ActivationOutcome {
        if cfg!(feature = "dev-unlock") {
            return ActivationOutcome::ok();
        }

        let code = code.trim();
        match self.transport.verify(code, &self.device_id).await {
            Ok(reply) if reply.success => {
                if let Err(e) = fs::write(&self.code_path, code) {
                    tracing::warn!(error = %e, "failed to persist activation code");
                }
                self.status = granted_status(&reply);
                ActivationOutcome::ok()
            }
            Ok(reply) => {
                if is_expired(&reply) {
                    self.clear_code();
                    self.status = SessionStatus::Locked;
                }
                ActivationOutcome::failed(reply.message)
            }
            Err(e) => {
                tracing::warn!(error = %e, "activation unreachable");
                ActivationOutcome::unreachable()
            }
        }
    }

    /// Request a trial for this device, then activate the issued code.
    pub async fn start_trial(&mut self) -> ActivationOutcome {
        if cfg!(feature = "dev-unlock") {
            return ActivationOutcome::ok();
        }

        match self.transport.issue_trial(&self.device_id).await {
            Ok(reply) => match reply.code {
                Some(code) if reply.success => self.activate(&code).await,
                _ => ActivationOutcome::failed(reply.message),
            },
            Err(e) => {
                tracing::warn!(error = %e, "trial issuance unreachable");
                ActivationOutcome::unreachable()
            }
        }
    }

    fn cached_code(&self) -> Option<String> {
        fs::read_to_string(&self.code_path)
            .ok()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
    }

    fn clear_code(&self) {
        let _ = fs::remove_file(&self.code_path);
    }
}

fn granted_status(reply: &VerifyReply) -> SessionStatus {
    match reply.kind.as_deref() {
        Some("trial") => SessionStatus::Trial {
            hours_remaining: reply.hours_remaining.unwrap_or(0),
        },
        Some("dev") => SessionStatus::Dev,
        _ => SessionStatus::Full,
    }
}

fn is_expired(reply: &VerifyReply) -> bool {
    reply.status.as_deref() == Some("expired")
}
