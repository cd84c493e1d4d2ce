//! Error types for the inference client.

use thiserror::Error;

/// Result type for inference client operations.
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Inference service client errors.
///
/// Every variant is recoverable from the caller's point of view; the
/// extraction pipeline maps all of them to its heuristic fallback path.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Configuration error (missing API key, invalid base URL)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP response from the service
    #[error("service returned HTTP {status}")]
    Api { status: u16, body: String },

    /// Response body was not valid JSON
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
