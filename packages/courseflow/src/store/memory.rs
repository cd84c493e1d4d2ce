//! In-memory record store for testing and development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{ExtractionError, Result};
use crate::traits::store::RecordStore;
use crate::types::store::StoreSnapshot;

/// In-memory implementation of [`RecordStore`].
///
/// Useful for tests and development; data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: RwLock<StoreSnapshot>,
    fail_next_save: AtomicBool,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn record_count(&self) -> usize {
        self.snapshot.read().unwrap().assignments.len()
    }

    /// Make the next `save` fail, for exercising pipeline-fatal paths.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Mark a record synced, as the external sync collaborator would.
    pub fn mark_synced(&self, id: &str) {
        let mut snapshot = self.snapshot.write().unwrap();
        if let Some(record) = snapshot.assignments.iter_mut().find(|a| a.id == id) {
            record.synced = true;
        }
        snapshot.recompute_aggregates();
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<StoreSnapshot> {
        Ok(self.snapshot.read().unwrap().clone())
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(ExtractionError::Storage(Box::new(std::io::Error::other(
                "simulated write failure",
            ))));
        }
        *self.snapshot.write().unwrap() = snapshot.clone();
        Ok(())
    }
}
