//! Inference trait - the AI-assisted extraction seam.

use async_trait::async_trait;

use crate::context::PageContext;
use crate::error::Result;
use crate::types::event::RawEvent;

/// A serialized page ready to send to the inference service.
#[derive(Debug, Clone)]
pub struct PagePayload {
    /// Page URL.
    pub url: String,

    /// Document title if available.
    pub title: Option<String>,

    /// Serialized content-area HTML, already capped to the byte budget.
    pub content: String,
}

/// Abstraction over the inference service.
///
/// Implementations wrap a concrete transport ([`crate::ai::HttpInference`]
/// in production, `MockInference` in tests) and are responsible for
/// validating the untrusted reply: a shape deviation must come back as a
/// typed error, never as a panic or a fabricated event list.
#[async_trait]
pub trait Inference: Send + Sync {
    /// Extract raw assignment events from a serialized page.
    ///
    /// Any error here is recoverable by design: the orchestrator maps it to
    /// the heuristic fallback path.
    async fn extract_events(&self, page: &PagePayload, context: PageContext)
        -> Result<Vec<RawEvent>>;
}

#[async_trait]
impl<T: Inference + ?Sized> Inference for std::sync::Arc<T> {
    async fn extract_events(
        &self,
        page: &PagePayload,
        context: PageContext,
    ) -> Result<Vec<RawEvent>> {
        (**self).extract_events(page, context).await
    }
}
