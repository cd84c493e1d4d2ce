//! Wire types for the inference service.
//!
//! The service speaks camelCase JSON. The reply's `events` field is kept as
//! a loose [`serde_json::Value`] on purpose: the service is an untrusted
//! boundary, and shape validation belongs to the consumer, which decides
//! whether a deviation means "no events" or "fall back".

use serde::{Deserialize, Serialize};

/// Request body for `POST /extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    /// Serialized page content, capped by the caller.
    pub content: String,

    /// Screenshot capture. Not implemented; always `None`.
    pub screenshot: Option<String>,

    /// Extraction-type tag (e.g. "assignments").
    pub extraction_type: String,

    /// Free-text context string (page label, URL, title).
    pub context: String,
}

impl ExtractRequest {
    /// Create a request for assignment extraction.
    pub fn assignments(content: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            screenshot: None,
            extraction_type: "assignments".to_string(),
            context: context.into(),
        }
    }
}

/// Reply body from `POST /extract`.
///
/// Both fields are tolerant: a reply missing either still deserializes, and
/// judging whether `events` is usable is the caller's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractReply {
    /// Extracted events, expected to be a JSON array of objects.
    #[serde(default)]
    pub events: serde_json::Value,

    /// Optional reply metadata.
    #[serde(default)]
    pub metadata: Option<ReplyMetadata>,
}

/// Metadata attached to an extraction reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMetadata {
    /// Method the service reports having used.
    #[serde(default)]
    pub extraction_method: Option<String>,
}
