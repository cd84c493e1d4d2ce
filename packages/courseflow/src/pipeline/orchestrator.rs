//! Extraction orchestrator - the top-level control loop.
//!
//! One orchestrator instance exists per page lifetime. It owns all the
//! mutable pipeline state (in-flight flag, last-completed instant, result
//! cache) so the mutual-exclusion and cooldown invariants are testable
//! without a DOM or a live service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::content;
use crate::context::PageContext;
use crate::error::Result;
use crate::heuristic;
use crate::normalize::normalize_events;
use crate::store::merge_new;
use crate::traits::inference::{Inference, PagePayload};
use crate::traits::store::RecordStore;
use crate::types::config::PipelineConfig;
use crate::types::event::{ExtractionMethod, RawEvent};
use crate::types::page::PageSnapshot;

use super::cache::{CacheKey, ResultCache};

/// Status event published to the external UI collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStatus {
    Idle,
    Extracting,
    Complete { count: usize },
    Error { message: String },
}

/// Outcome of one orchestrator invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// A run was already in flight; this call did nothing.
    Busy,
    /// The cooldown interval since the last completed run has not elapsed.
    CoolingDown,
    /// The run completed but found nothing.
    NoCandidates,
    /// The run completed with results.
    Completed {
        /// Assignments found on the page this run.
        found: usize,
        /// Records actually appended to the store.
        new_records: usize,
    },
    /// An unexpected internal failure; the in-flight flag is reset and
    /// later runs are unaffected.
    Failed { message: String },
}

/// Resets the in-flight flag on every exit path, including early returns.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The extraction pipeline's top-level control loop.
pub struct Orchestrator<I, S> {
    config: PipelineConfig,
    inference: I,
    store: S,
    cache: Mutex<ResultCache>,
    in_flight: AtomicBool,
    last_completed: Mutex<Option<Instant>>,
    status_tx: watch::Sender<PipelineStatus>,
}

impl<I: Inference, S: RecordStore> Orchestrator<I, S> {
    /// Create an orchestrator for one page lifetime.
    pub fn new(inference: I, store: S, config: PipelineConfig) -> Self {
        let cache = ResultCache::new(config.cache_capacity, config.cache_max_age);
        let (status_tx, _) = watch::channel(PipelineStatus::Idle);
        Self {
            config,
            inference,
            store,
            cache: Mutex::new(cache),
            in_flight: AtomicBool::new(false),
            last_completed: Mutex::new(None),
            status_tx,
        }
    }

    /// Subscribe to status events. Publishing is best-effort: the pipeline
    /// runs the same whether or not anyone listens.
    pub fn subscribe_status(&self) -> watch::Receiver<PipelineStatus> {
        self.status_tx.subscribe()
    }

    /// Run the extraction pipeline once against the given page.
    ///
    /// Never returns an error: a concurrent call reports `Busy`, a call
    /// inside the cooldown window reports `CoolingDown`, and any internal
    /// failure is caught, reported on the status channel, and returned as
    /// `Failed` with the in-flight flag reset.
    pub async fn run(&self, page: &PageSnapshot) -> RunOutcome {
        // Gate (a): mutual exclusion. A concurrent call returns immediately
        // rather than queuing.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!(url = %page.url, "Run already in flight, skipping");
            return RunOutcome::Busy;
        }
        let _guard = InFlightGuard(&self.in_flight);

        // Gate (b): cooldown since the previous completed run.
        if let Some(last) = *self.last_completed.lock().unwrap() {
            if last.elapsed() < self.config.cooldown {
                debug!(url = %page.url, "Within cooldown window, skipping");
                return RunOutcome::CoolingDown;
            }
        }

        self.status_tx.send_replace(PipelineStatus::Extracting);

        match self.run_inner(page).await {
            Ok(outcome) => {
                *self.last_completed.lock().unwrap() = Some(Instant::now());
                let count = match &outcome {
                    RunOutcome::Completed { found, .. } => *found,
                    _ => 0,
                };
                self.status_tx
                    .send_replace(PipelineStatus::Complete { count });
                outcome
            }
            Err(e) => {
                warn!(url = %page.url, error = %e, "Pipeline run failed");
                let message = e.to_string();
                self.status_tx.send_replace(PipelineStatus::Error {
                    message: message.clone(),
                });
                RunOutcome::Failed { message }
            }
        }
    }

    async fn run_inner(&self, page: &PageSnapshot) -> Result<RunOutcome> {
        let context = PageContext::classify(&page.url);
        debug!(url = %page.url, context = %context, "Starting extraction run");

        let areas = content::select_content_areas(&page.html, context);
        if areas.is_empty() {
            info!(url = %page.url, "No content areas found");
            return Ok(RunOutcome::NoCandidates);
        }

        let key = CacheKey {
            url: page.url.clone(),
            content_hash: page.content_hash(),
            context,
        };

        let cached = self.cache.lock().unwrap().get(&key);
        let events = match cached {
            Some(events) => {
                debug!(url = %page.url, events = events.len(), "Result cache hit");
                events
            }
            None => {
                let events = self.extract(page, context, &areas).await;
                self.cache.lock().unwrap().insert(key, events.clone());
                events
            }
        };

        let found = events.len();
        let default_course = content::resolve_course(&page.html, &page.url);
        let assignments = normalize_events(events, page, default_course.as_deref());
        let normalized = assignments.len();

        let mut snapshot = self.store.load().await?;
        let new_records = merge_new(&mut snapshot, assignments, self.config.retention_cap);
        self.store.save(&snapshot).await?;

        info!(
            url = %page.url,
            context = %context,
            found,
            normalized,
            new_records,
            "Extraction run complete"
        );

        if normalized == 0 {
            Ok(RunOutcome::NoCandidates)
        } else {
            Ok(RunOutcome::Completed {
                found: normalized,
                new_records,
            })
        }
    }

    /// Dispatch to the AI path with unconditional heuristic fallback.
    ///
    /// Pages the AI path does not target go straight to the heuristic
    /// extractor. An AI failure of any kind falls back to the heuristic
    /// extractor and is never propagated.
    async fn extract(
        &self,
        page: &PageSnapshot,
        context: PageContext,
        areas: &[String],
    ) -> Vec<RawEvent> {
        if context == PageContext::Unknown {
            return heuristic::extract_events(
                &page.html,
                &page.url,
                self.config.heuristic_confidence,
            );
        }

        let payload = PagePayload {
            url: page.url.clone(),
            title: page.title.clone(),
            content: PageSnapshot::cap_content(&areas.join("\n"), self.config.max_content_bytes),
        };

        match self.inference.extract_events(&payload, context).await {
            Ok(events) => events,
            Err(e) => {
                warn!(url = %page.url, error = %e, "AI extraction failed, using heuristic fallback");
                let events = heuristic::extract_events(
                    &page.html,
                    &page.url,
                    self.config.heuristic_confidence,
                );
                RawEvent::retag(events, ExtractionMethod::Fallback)
            }
        }
    }
}
