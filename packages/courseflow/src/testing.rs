//! Testing utilities including mock implementations.
//!
//! Useful for testing applications that embed the pipeline without a live
//! inference service or a real page.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::context::PageContext;
use crate::error::{ExtractionError, Result};
use crate::traits::inference::{Inference, PagePayload};
use crate::traits::page::PageSource;
use crate::types::event::{ExtractionMethod, RawEvent};
use crate::types::page::PageSnapshot;

/// A failure mode for [`MockInference`].
#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    /// Connection-level failure.
    Network,
    /// Non-success HTTP status.
    Http(u16),
    /// Reply arrived but its shape was wrong.
    Malformed,
}

/// Record of one call made to the mock inference service.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub url: String,
    pub context: PageContext,
    pub content_len: usize,
}

/// A mock inference implementation with canned events, failure injection,
/// and call tracking.
#[derive(Default, Clone)]
pub struct MockInference {
    events: Arc<RwLock<Vec<RawEvent>>>,
    failure: Arc<RwLock<Option<MockFailure>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    calls: Arc<RwLock<Vec<MockCall>>>,
}

impl MockInference {
    /// Create a mock that returns no events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canned events returned on success.
    pub fn with_events(self, events: Vec<RawEvent>) -> Self {
        *self.events.write().unwrap() = events;
        self
    }

    /// Make every call fail with the given mode.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        *self.failure.write().unwrap() = Some(failure);
        self
    }

    /// Add an artificial delay before each reply.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write().unwrap() = Some(delay);
        self
    }

    /// Clear any injected failure.
    pub fn recover(&self) {
        *self.failure.write().unwrap() = None;
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Inference for MockInference {
    async fn extract_events(
        &self,
        page: &PagePayload,
        context: PageContext,
    ) -> Result<Vec<RawEvent>> {
        self.calls.write().unwrap().push(MockCall {
            url: page.url.clone(),
            context,
            content_len: page.content.len(),
        });

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = *self.failure.read().unwrap();
        match failure {
            Some(MockFailure::Network) => Err(ExtractionError::Inference(Box::new(
                std::io::Error::other("connection refused"),
            ))),
            Some(MockFailure::Http(status)) => Err(ExtractionError::Inference(Box::new(
                std::io::Error::other(format!("service returned HTTP {status}")),
            ))),
            Some(MockFailure::Malformed) => {
                Err(ExtractionError::malformed("`events` is missing or not an array"))
            }
            None => Ok(RawEvent::retag(
                self.events.read().unwrap().clone(),
                ExtractionMethod::Ai,
            )),
        }
    }
}

/// A [`PageSource`] serving a settable snapshot.
#[derive(Clone)]
pub struct StaticPage {
    page: Arc<RwLock<PageSnapshot>>,
}

impl StaticPage {
    /// Create a source serving the given snapshot.
    pub fn new(page: PageSnapshot) -> Self {
        Self {
            page: Arc::new(RwLock::new(page)),
        }
    }

    /// Replace the served snapshot, as a navigation would.
    pub fn set(&self, page: PageSnapshot) {
        *self.page.write().unwrap() = page;
    }
}

impl PageSource for StaticPage {
    fn snapshot(&self) -> PageSnapshot {
        self.page.read().unwrap().clone()
    }
}
