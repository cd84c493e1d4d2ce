//! Canonical assignment records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::ExtractionMethod;

/// Assignment priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Assignment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
    Graded,
    Overdue,
    Missing,
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Structured grade information classified from free-form text.
///
/// Exactly the fields the matching pattern produced are set; an
/// unrecognized input keeps only `display`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeInfo {
    /// Points earned.
    pub points: Option<f64>,

    /// Maximum points possible.
    pub max_points: Option<f64>,

    /// Percentage score (0-100).
    pub percentage: Option<f64>,

    /// Letter grade ("A-", "B+", ...).
    pub letter_grade: Option<String>,

    /// Verbatim text when no pattern matched.
    pub display: Option<String>,
}

impl GradeInfo {
    /// Whether any structured value (not just display text) was parsed.
    pub fn has_structured_value(&self) -> bool {
        self.points.is_some() || self.percentage.is_some() || self.letter_grade.is_some()
    }
}

/// A canonical, persisted assignment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Opaque id, unique per insertion. Never derived from content.
    pub id: String,

    /// Cleaned title (trimmed, whitespace-collapsed, prefix-stripped,
    /// length-capped).
    pub title: String,

    /// Course name, "Unknown Course" when unresolvable.
    pub course: String,

    /// Optional description.
    pub description: Option<String>,

    /// Due date. `None` means "unparsed", not "no due date"; a present
    /// value is a valid timestamp by construction.
    pub due_date: Option<DateTime<Utc>>,

    /// Absolute item URL.
    pub url: String,

    /// Priority.
    pub priority: Priority,

    /// Status.
    pub status: AssignmentStatus,

    /// Grade, when any grade text was present.
    pub grade: Option<GradeInfo>,

    /// Estimated effort in minutes.
    pub estimated_minutes: Option<u32>,

    /// Extraction confidence, 0.0 to 1.0.
    pub confidence: f32,

    /// Which backend produced the record.
    pub extraction_method: ExtractionMethod,

    /// When the record was captured.
    pub scraped_at: DateTime<Utc>,

    /// Whether the downstream sync collaborator has acknowledged this
    /// record. Always false on insertion; the pipeline never sets it.
    #[serde(default)]
    pub synced: bool,
}

impl Assignment {
    /// The dedup identity: exact (title, course), case-sensitive, post-trim.
    ///
    /// Intentionally coarse. It under-merges retitled assignments and
    /// over-merges distinct items sharing a title within a course (e.g. a
    /// recurring "Weekly Quiz"); neither due date nor URL participates.
    pub fn identity(&self) -> (&str, &str) {
        (&self.title, &self.course)
    }

    /// Whether another record refers to the same real-world assignment.
    pub fn same_assignment(&self, other: &Assignment) -> bool {
        self.identity() == other.identity()
    }
}
