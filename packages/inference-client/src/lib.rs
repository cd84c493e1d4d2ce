//! Pure REST client for the assignment inference service
//!
//! A clean, minimal client with no domain-specific logic: wire types,
//! bearer auth, and typed errors. Interpreting the reply (including deciding
//! whether it is well-shaped) is the consumer's responsibility.
//!
//! # Example
//!
//! ```rust,ignore
//! use inference_client::{ExtractRequest, InferenceClient};
//!
//! let client = InferenceClient::from_env()?;
//! let reply = client
//!     .extract(&ExtractRequest::assignments(html, "course_assignments"))
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{InferenceError, Result};
pub use types::{ExtractReply, ExtractRequest, ReplyMetadata};

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Inference service API client.
#[derive(Clone)]
pub struct InferenceClient {
    http_client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl InferenceClient {
    /// Create a new client with the given API key and base URL.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            api_key: SecretString::from(api_key.into()),
            base_url: base_url.into(),
        })
    }

    /// Create from `INFERENCE_API_KEY` and `INFERENCE_BASE_URL` environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("INFERENCE_API_KEY")
            .map_err(|_| InferenceError::Config("INFERENCE_API_KEY not set".into()))?;
        let base_url = std::env::var("INFERENCE_BASE_URL")
            .map_err(|_| InferenceError::Config("INFERENCE_BASE_URL not set".into()))?;
        Self::new(api_key, base_url)
    }

    /// Set a custom base URL (for staging, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one extraction request against the service.
    ///
    /// Returns the reply as-is; non-2xx statuses and unparseable bodies
    /// become typed errors.
    pub async fn extract(&self, request: &ExtractRequest) -> Result<ExtractReply> {
        let url = format!("{}/extract", self.base_url.trim_end_matches('/'));
        debug!(
            url = %url,
            content_len = request.content.len(),
            context = %request.context,
            "Sending extraction request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Inference service returned error");
            return Err(InferenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let reply: ExtractReply = serde_json::from_str(&text)?;
        debug!(
            has_events = !reply.events.is_null(),
            "Received extraction reply"
        );
        Ok(reply)
    }
}
