//! Form relay delivery.
//!
//! [`RelayClient`] POSTs a JSON-encoded [`RelayPayload`] to the relay
//! endpoint. A submission is attempted once; on failure the customer is
//! told and may submit again.

use std::time::Duration;

use async_trait::async_trait;
use invitewiz_core::submission::RelayPayload;
use serde::Deserialize;

use crate::submitter::OrderSubmitter;

/// HTTP request timeout for a single submission.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default relay endpoint when `FORM_RELAY_URL` is not set.
const DEFAULT_RELAY_URL: &str = "https://api.web3forms.com/submit";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for relay submission failures.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay returned a non-2xx status code.
    #[error("Form relay returned HTTP {0}")]
    HttpStatus(u16),

    /// The relay accepted the request but reported a failure.
    #[error("Form relay rejected the submission: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// RelayConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    pub access_key: String,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `FORM_RELAY_ACCESS_KEY` is not set, signalling that
    /// submissions cannot be delivered.
    ///
    /// | Variable                | Required | Default                            |
    /// |-------------------------|----------|------------------------------------|
    /// | `FORM_RELAY_ACCESS_KEY` | yes      | (none)                             |
    /// | `FORM_RELAY_URL`        | no       | `https://api.web3forms.com/submit` |
    pub fn from_env() -> Option<Self> {
        let access_key = std::env::var("FORM_RELAY_ACCESS_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            url: std::env::var("FORM_RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string()),
            access_key,
        })
    }
}

// ---------------------------------------------------------------------------
// RelayClient
// ---------------------------------------------------------------------------

/// Relay response body. Both fields are optional so unexpected shapes
/// still fall through to the status check.
#[derive(Debug, Deserialize)]
struct RelayResponse {
    success: Option<bool>,
    message: Option<String>,
}

pub struct RelayClient {
    client: reqwest::Client,
    url: String,
}

impl RelayClient {
    /// Create a client for the given relay endpoint.
    pub fn new(url: impl Into<String>) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        Self::new(config.url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl OrderSubmitter for RelayClient {
    async fn submit(&self, payload: &RelayPayload) -> Result<(), RelayError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "Form relay returned an error status");
            return Err(RelayError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        if let Ok(parsed) = serde_json::from_str::<RelayResponse>(&body) {
            if parsed.success == Some(false) {
                let message = parsed
                    .message
                    .unwrap_or_else(|| "no reason given".to_string());
                tracing::warn!(url = %self.url, %message, "Form relay rejected submission");
                return Err(RelayError::Rejected(message));
            }
        }

        tracing::info!(
            url = %self.url,
            subject = %payload.subject,
            attachment = %payload.attachment.filename,
            "Order submitted to form relay"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
