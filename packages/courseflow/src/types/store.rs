//! Persisted store snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::Assignment;

/// The full persisted state of the pipeline.
///
/// Read in full at the start of every merge and written back in full at the
/// end. Aggregates are recomputed on every write, never updated
/// incrementally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All persisted assignment records, oldest first.
    #[serde(default)]
    pub assignments: Vec<Assignment>,

    /// When the last pipeline run completed a merge.
    pub last_scan: Option<DateTime<Utc>>,

    /// Count of records not yet acknowledged by the sync collaborator.
    #[serde(default)]
    pub unsynced_count: usize,

    /// Mean extraction confidence across stored records.
    #[serde(default)]
    pub average_confidence: f32,
}

impl StoreSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the unsynced-count and confidence aggregates from the
    /// current record list.
    pub fn recompute_aggregates(&mut self) {
        self.unsynced_count = self.assignments.iter().filter(|a| !a.synced).count();
        self.average_confidence = if self.assignments.is_empty() {
            0.0
        } else {
            self.assignments.iter().map(|a| a.confidence).sum::<f32>()
                / self.assignments.len() as f32
        };
    }
}
