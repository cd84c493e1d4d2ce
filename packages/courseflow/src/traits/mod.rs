//! Core trait abstractions (Inference, RecordStore, PageSource).

pub mod inference;
pub mod page;
pub mod store;

pub use inference::Inference;
pub use page::PageSource;
pub use store::RecordStore;
