//! Data types for the extraction pipeline.

pub mod assignment;
pub mod config;
pub mod event;
pub mod page;
pub mod store;

pub use assignment::{Assignment, AssignmentStatus, GradeInfo, Priority};
pub use config::PipelineConfig;
pub use event::{ExtractionMethod, RawEvent};
pub use page::PageSnapshot;
pub use store::StoreSnapshot;
