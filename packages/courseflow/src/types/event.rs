//! Raw extraction events - pre-normalization output of both backends.

use serde::{Deserialize, Serialize};

/// Which path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Inference-service extraction.
    Ai,
    /// Heuristic extraction used as fallback after an AI failure.
    Fallback,
    /// Heuristic extraction used as the primary path.
    Heuristic,
}

impl Default for ExtractionMethod {
    fn default() -> Self {
        Self::Heuristic
    }
}

/// A single pre-normalization event from an extractor.
///
/// Shape is deliberately loose: the AI path deserializes these from an
/// untrusted payload, so every field is defaulted and free-form. Events are
/// consumed within one pipeline run and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Candidate title; may be empty or garbage.
    #[serde(default)]
    pub title: String,

    /// Course name if the extractor found one.
    #[serde(default)]
    pub course: Option<String>,

    /// Optional description text.
    #[serde(default)]
    pub description: Option<String>,

    /// Free-form due-date text ("Due Jun 15 at 11:59pm", ISO string, ...).
    #[serde(default)]
    pub due_date: Option<String>,

    /// Item URL, absolute or relative.
    #[serde(default)]
    pub url: Option<String>,

    /// Free-form grade/points text ("92/100", "40 pts", "A-").
    #[serde(default)]
    pub grade_text: Option<String>,

    /// Free-form status text ("submitted", "overdue", ...).
    #[serde(default)]
    pub status_text: Option<String>,

    /// Free-form priority hint ("high", "urgent", ...).
    #[serde(default)]
    pub priority_hint: Option<String>,

    /// Free-form estimated-duration hint ("45 minutes", "90").
    #[serde(default)]
    pub duration_hint: Option<String>,

    /// Extractor confidence, 0.0 to 1.0.
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// Which backend produced this event.
    #[serde(default)]
    pub method: ExtractionMethod,
}

fn default_confidence() -> f32 {
    0.5
}

impl RawEvent {
    /// Create an event with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Tag every event in a batch with a method, preserving other fields.
    pub fn retag(events: Vec<RawEvent>, method: ExtractionMethod) -> Vec<RawEvent> {
        events
            .into_iter()
            .map(|mut e| {
                e.method = method;
                e
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sparse_object() {
        let event: RawEvent = serde_json::from_str(r#"{"title":"Essay 1"}"#).unwrap();
        assert_eq!(event.title, "Essay 1");
        assert!(event.course.is_none());
        assert!((event.confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_deserialize_empty_object() {
        let event: RawEvent = serde_json::from_str("{}").unwrap();
        assert!(event.title.is_empty());
    }

    #[test]
    fn test_retag() {
        let events = vec![RawEvent::new("a"), RawEvent::new("b")];
        let retagged = RawEvent::retag(events, ExtractionMethod::Fallback);
        assert!(retagged.iter().all(|e| e.method == ExtractionMethod::Fallback));
    }
}
