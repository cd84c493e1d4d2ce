//! RecordStore trait - the persisted-store seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::store::StoreSnapshot;

/// Abstraction over the persisted assignment store.
///
/// The pipeline always reads the full snapshot before a merge and writes
/// the full snapshot after; last-write-wins is safe because at most one
/// pipeline run is in flight at a time.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the full store snapshot; an empty snapshot on first run.
    async fn load(&self) -> Result<StoreSnapshot>;

    /// Write the full store snapshot back.
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    async fn load(&self) -> Result<StoreSnapshot> {
        (**self).load().await
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        (**self).save(snapshot).await
    }
}
