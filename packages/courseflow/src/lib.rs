//! Assignment extraction pipeline for learning-management pages
//!
//! Ingests semi-structured, highly variable HTML from a learning-management
//! web application and produces a canonical list of assignment records. The
//! pipeline runs unattended against a constantly-mutating document, avoids
//! hammering the inference service, never loses or duplicates records
//! across repeated runs of the same page, and degrades to local heuristics
//! whenever the service is unavailable.
//!
//! # Pipeline
//!
//! page classification → content-area selection → cooldown/cache-gated
//! extraction (AI-assisted, heuristic fallback) → normalization →
//! idempotent merge into the record store → change-triggered re-execution.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use courseflow::{
//!     HttpInference, MemoryStore, Orchestrator, PageEvent, PipelineConfig, Scheduler,
//! };
//! use inference_client::InferenceClient;
//!
//! let inference = HttpInference::new(InferenceClient::from_env()?);
//! let orchestrator = Arc::new(Orchestrator::new(
//!     inference,
//!     MemoryStore::new(),
//!     PipelineConfig::default(),
//! ));
//! let scheduler = Scheduler::spawn(orchestrator.clone(), page_source, PipelineConfig::default());
//!
//! // Host glue feeds raw signals; the scheduler and orchestrator gate them
//! scheduler.notify(PageEvent::Loaded);
//! ```
//!
//! # Modules
//!
//! - [`context`] - page classification from URLs
//! - [`content`] - content-area selection over parsed HTML
//! - [`ai`] / [`heuristic`] - the two extraction backends
//! - [`normalize`] - raw events to canonical records
//! - [`store`] - dedup merge and persistence
//! - [`pipeline`] - orchestrator, result cache, scheduler
//! - [`testing`] - mock implementations for embedders' tests

pub mod ai;
pub mod content;
pub mod context;
pub mod error;
pub mod heuristic;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use ai::HttpInference;
pub use context::PageContext;
pub use error::{ExtractionError, Result};
pub use pipeline::{Orchestrator, PageEvent, PipelineStatus, ResultCache, RunOutcome, Scheduler};
pub use store::{merge_new, MemoryStore};
pub use traits::{
    inference::{Inference, PagePayload},
    page::PageSource,
    store::RecordStore,
};
pub use types::{
    assignment::{Assignment, AssignmentStatus, GradeInfo, Priority},
    config::PipelineConfig,
    event::{ExtractionMethod, RawEvent},
    page::PageSnapshot,
    store::StoreSnapshot,
};
