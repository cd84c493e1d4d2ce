//! Dedup merge into the persisted assignment store.
//!
//! The merge is a set union under the coarse (title, course) identity:
//! a new record is appended iff no existing record shares its identity,
//! and existing records are never mutated or deleted here. Aggregates are
//! recomputed from scratch after every merge.

pub mod memory;

pub use memory::MemoryStore;

use chrono::Utc;
use tracing::debug;

use crate::types::assignment::Assignment;
use crate::types::store::StoreSnapshot;

/// Merge newly normalized records into a store snapshot.
///
/// Returns the number of records actually appended. The retention cap
/// keeps only the most recent `retention_cap` records, dropping the
/// oldest, so repeated scans of long-lived pages cannot grow the store
/// without bound.
pub fn merge_new(
    snapshot: &mut StoreSnapshot,
    incoming: Vec<Assignment>,
    retention_cap: usize,
) -> usize {
    let mut added = 0;
    for record in incoming {
        if snapshot
            .assignments
            .iter()
            .any(|existing| existing.same_assignment(&record))
        {
            continue;
        }
        snapshot.assignments.push(record);
        added += 1;
    }

    if snapshot.assignments.len() > retention_cap {
        let excess = snapshot.assignments.len() - retention_cap;
        snapshot.assignments.drain(..excess);
    }

    snapshot.last_scan = Some(Utc::now());
    snapshot.recompute_aggregates();

    debug!(
        added,
        total = snapshot.assignments.len(),
        unsynced = snapshot.unsynced_count,
        "Merge complete"
    );
    added
}
