//! Typed errors for the extraction pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur inside the extraction pipeline.
///
/// Note that `Inference` and `MalformedResponse` never escape the
/// orchestrator: both are mapped to the heuristic fallback path.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Inference service unavailable or failed
    #[error("inference service error: {0}")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Inference reply did not match the expected shape
    #[error("malformed inference response: {reason}")]
    MalformedResponse { reason: String },

    /// Record store operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ExtractionError {
    /// Build a malformed-response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
