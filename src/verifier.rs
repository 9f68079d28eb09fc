//! Captcha token verification against a Cap.js-compatible `siteverify` endpoint.
//!
//! Wire protocol:
//!   POST {endpoint}/{site_key}/siteverify
//!   Content-Type: application/json
//!   {"secret": "...", "response": "<token>"}
//! Reply: {"success": true} or {"success": false, "error": "..."}
//!
//! Single shot, no retries. Every failure (transport, status, body) is folded
//! into a `VerificationResult` with `success = false`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::VerificationConfig;
use crate::constants::SITEVERIFY_PATH;
use crate::error::ShieldResult;

/// Fallback error when the service rejects a token without saying why.
pub const DEFAULT_FAILURE: &str = "verification failed";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VerificationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()) }
    }
}

#[derive(Debug, Serialize)]
struct SiteVerifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
}

// ============================================================================
// TRANSPORT
// ============================================================================

/// Raw HTTP reply. `body` is only read for 2xx statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// "Send a JSON POST, get status + body back."
pub trait HttpTransport: Send + Sync {
    fn post_json(&self, url: &str, body: &[u8]) -> ShieldResult<HttpReply>;
}

/// Blocking `ureq` transport with a global per-request timeout.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl HttpTransport for UreqTransport {
    fn post_json(&self, url: &str, body: &[u8]) -> ShieldResult<HttpReply> {
        let response = ureq::post(url)
            .header("Content-Type", "application/json")
            .config()
            .timeout_global(Some(self.timeout))
            .http_status_as_error(false)
            .build()
            .send(body)?;

        let status = response.status().as_u16();
        let body = if (200..300).contains(&status) {
            response.into_body().read_to_string()?
        } else {
            String::new()
        };
        Ok(HttpReply { status, body })
    }
}

// ============================================================================
// VERIFICATION
// ============================================================================

pub fn siteverify_url(endpoint: &str, site_key: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), site_key, SITEVERIFY_PATH)
}

/// Exchange `token` with the remote service. Never fails outward.
pub fn verify(
    transport: &dyn HttpTransport,
    endpoint: &str,
    site_key: &str,
    secret: &str,
    token: &str,
) -> VerificationResult {
    let url = siteverify_url(endpoint, site_key);
    let body = match serde_json::to_vec(&SiteVerifyRequest { secret, response: token }) {
        Ok(b) => b,
        Err(e) => return VerificationResult::failed(e.to_string()),
    };

    let reply = match transport.post_json(&url, &body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Captcha verification request failed");
            return VerificationResult::failed(e.to_string());
        }
    };

    if !reply.is_success() {
        tracing::warn!(url = %url, status = reply.status, "Captcha service returned error status");
        return VerificationResult::failed(format!("remote API returned {}", reply.status));
    }

    let result = parse_reply(&reply.body);
    tracing::debug!(success = result.success, "Captcha verification completed");
    result
}

/// Interpret a 2xx body. `success` counts only when it is literally `true`.
fn parse_reply(body: &str) -> VerificationResult {
    let data: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return VerificationResult::failed(format!("invalid response body: {}", e)),
    };
    if data.get("success").and_then(|v| v.as_bool()) == Some(true) {
        return VerificationResult::ok();
    }
    let error = data
        .get("error")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FAILURE);
    VerificationResult::failed(error)
}

/// Verifier bound to one service descriptor and transport.
#[derive(Clone)]
pub struct TokenVerifier {
    config: VerificationConfig,
    transport: Arc<dyn HttpTransport>,
}

impl TokenVerifier {
    pub fn new(config: VerificationConfig) -> Self {
        let transport = Arc::new(UreqTransport::new(Duration::from_secs(config.timeout_secs)));
        Self { config, transport }
    }

    pub fn with_transport(config: VerificationConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn verify(&self, token: &str) -> VerificationResult {
        verify(
            self.transport.as_ref(),
            &self.config.api_endpoint,
            &self.config.site_key,
            &self.config.secret_key,
            token,
        )
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").field("config", &self.config).finish_non_exhaustive()
    }
}
