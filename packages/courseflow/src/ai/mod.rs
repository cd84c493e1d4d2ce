//! AI-assisted extraction over the inference service.
//!
//! The service reply is an untrusted, loosely-typed payload. Validation
//! happens here, at the boundary: a missing or non-array `events` field
//! becomes a typed [`ExtractionError::MalformedResponse`] (which the
//! orchestrator maps to the heuristic fallback), and individually
//! malformed array elements are skipped without affecting their siblings.

use async_trait::async_trait;
use tracing::{debug, warn};

use inference_client::{ExtractRequest, InferenceClient};

use crate::context::PageContext;
use crate::error::{ExtractionError, Result};
use crate::traits::inference::{Inference, PagePayload};
use crate::types::event::{ExtractionMethod, RawEvent};

/// Confidence assumed for AI events that arrive without one.
const DEFAULT_AI_CONFIDENCE: f32 = 0.8;

/// Inference-service backed extractor.
pub struct HttpInference {
    client: InferenceClient,
}

impl HttpInference {
    /// Wrap an inference client.
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Inference for HttpInference {
    async fn extract_events(
        &self,
        page: &PagePayload,
        context: PageContext,
    ) -> Result<Vec<RawEvent>> {
        let context_string = format!(
            "{} | {} | {}",
            context,
            page.url,
            page.title.as_deref().unwrap_or("")
        );
        let request = ExtractRequest::assignments(page.content.clone(), context_string);

        let reply = self
            .client
            .extract(&request)
            .await
            .map_err(|e| ExtractionError::Inference(Box::new(e)))?;

        let events = parse_events_payload(&reply.events)?;
        debug!(events = events.len(), "AI extraction produced events");
        Ok(events)
    }
}

/// Validate the untrusted `events` payload into typed raw events.
///
/// A payload whose `events` is missing or not an array is malformed as a
/// whole; a malformed element inside a valid array is skipped.
pub fn parse_events_payload(events: &serde_json::Value) -> Result<Vec<RawEvent>> {
    let Some(array) = events.as_array() else {
        return Err(ExtractionError::malformed(
            "`events` is missing or not an array",
        ));
    };

    let mut parsed = Vec::with_capacity(array.len());
    for value in array {
        if !value.is_object() {
            warn!("Skipping non-object event in inference reply");
            continue;
        }
        match serde_json::from_value::<RawEvent>(value.clone()) {
            Ok(mut event) => {
                event.method = ExtractionMethod::Ai;
                if value.get("confidence").is_none() {
                    event.confidence = DEFAULT_AI_CONFIDENCE;
                }
                parsed.push(event);
            }
            Err(e) => {
                warn!(error = %e, "Skipping malformed event in inference reply");
            }
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_events_is_malformed() {
        let err = parse_events_payload(&serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse { .. }));

        let err = parse_events_payload(&json!({"events": "nope"})).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedResponse { .. }));
    }

    #[test]
    fn test_valid_events_are_tagged_ai() {
        let payload = json!([
            {"title": "Essay 1", "dueDate": "Jun 15 at 11:59pm", "confidence": 0.95},
            {"title": "Quiz 2"}
        ]);
        let events = parse_events_payload(&payload).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.method == ExtractionMethod::Ai));
        assert!((events[0].confidence - 0.95).abs() < f32::EPSILON);
        // Missing confidence gets the AI default
        assert!((events[1].confidence - DEFAULT_AI_CONFIDENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let payload = json!([
            {"title": "Essay 1"},
            "garbage",
            42,
            {"title": 17}
        ]);
        let events = parse_events_payload(&payload).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Essay 1");
    }

    #[test]
    fn test_empty_array_is_no_events_not_an_error() {
        let events = parse_events_payload(&json!([])).unwrap();
        assert!(events.is_empty());
    }
}
