//! Extraction pipeline - orchestration, caching, and scheduling.

pub mod cache;
pub mod orchestrator;
pub mod scheduler;

pub use cache::{CacheKey, ResultCache};
pub use orchestrator::{Orchestrator, PipelineStatus, RunOutcome};
pub use scheduler::{PageEvent, Scheduler};
