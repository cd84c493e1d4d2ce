//! PageSource trait - where the scheduler gets the current document.

use crate::types::page::PageSnapshot;

/// Provides the current page at the moment a run is about to start.
///
/// The scheduler takes a fresh snapshot per run rather than reusing the one
/// that existed when the trigger fired, so a run always sees the settled
/// document.
pub trait PageSource: Send + Sync {
    /// Capture the current page.
    fn snapshot(&self) -> PageSnapshot;
}

impl<T: PageSource + ?Sized> PageSource for std::sync::Arc<T> {
    fn snapshot(&self) -> PageSnapshot {
        (**self).snapshot()
    }
}
