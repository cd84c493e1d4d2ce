//! Change-triggered scheduling of extraction runs.
//!
//! Three independent signal sources - DOM mutation batches, single-page-app
//! navigation, and staged post-load delays - all feed one internal trigger
//! channel. The consumer debounces with a settle delay, absorbs bursts,
//! takes a fresh page snapshot, and calls the single orchestrator entry
//! point. The orchestrator's cooldown and mutual-exclusion gates do the
//! rest: overlapping triggers collapse into one run.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::traits::inference::Inference;
use crate::traits::page::PageSource;
use crate::traits::store::RecordStore;
use crate::types::config::PipelineConfig;

use super::orchestrator::Orchestrator;

/// Markers that make a DOM mutation batch worth re-extracting for.
const MUTATION_MARKERS: &[&str] = &[
    "assignment",
    "due",
    "quiz",
    "exam",
    "homework",
    "grade",
    "planner",
    "todo",
];

/// Path fragments that make a navigation worth re-extracting for.
const RELEVANT_PATHS: &[&str] = &["dashboard", "courses", "assignments", "calendar", "grades"];

/// A raw signal from the host embedding the pipeline.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A batch of DOM mutations; carries the text of added nodes.
    Mutation { added_text: Vec<String> },
    /// The SPA navigated to a new URL.
    Navigation { url: String },
    /// Initial page load finished.
    Loaded,
}

enum Message {
    Page(PageEvent),
    /// Internal staged-delay trigger.
    Tick,
}

/// Drives re-execution of the orchestrator from page events.
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Message>,
    task: tokio::task::JoinHandle<()>,
}

impl Scheduler {
    /// Spawn the scheduler task.
    pub fn spawn<I, S, P>(
        orchestrator: Arc<Orchestrator<I, S>>,
        page_source: Arc<P>,
        config: PipelineConfig,
    ) -> Self
    where
        I: Inference + 'static,
        S: RecordStore + 'static,
        P: PageSource + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_loop(orchestrator, page_source, config, rx, tx.clone()));
        Self { tx, task }
    }

    /// Feed a page event to the scheduler. Best-effort: never errors, even
    /// after shutdown.
    pub fn notify(&self, event: PageEvent) {
        let _ = self.tx.send(Message::Page(event));
    }

    /// Stop the scheduler task.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

async fn run_loop<I, S, P>(
    orchestrator: Arc<Orchestrator<I, S>>,
    page_source: Arc<P>,
    config: PipelineConfig,
    mut rx: mpsc::UnboundedReceiver<Message>,
    tx: mpsc::UnboundedSender<Message>,
) where
    I: Inference + 'static,
    S: RecordStore + 'static,
    P: PageSource + 'static,
{
    while let Some(message) = rx.recv().await {
        let triggered = match message {
            Message::Page(PageEvent::Mutation { added_text }) => {
                mutation_is_relevant(&added_text)
            }
            Message::Page(PageEvent::Navigation { url }) => navigation_is_relevant(&url),
            Message::Page(PageEvent::Loaded) => {
                // Staged delays catch fast, normal, and slow hydration
                for delay in config.load_stage_delays.clone() {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Message::Tick);
                    });
                }
                false
            }
            Message::Tick => true,
        };
        if !triggered {
            continue;
        }

        // Settle, then absorb the rest of the burst into this one run
        tokio::time::sleep(config.settle_delay).await;
        while rx.try_recv().is_ok() {}

        let page = page_source.snapshot();
        let outcome = orchestrator.run(&page).await;
        debug!(url = %page.url, ?outcome, "Scheduled run finished");
    }
}

/// A mutation batch is relevant when an added node carries an
/// assignment-domain marker.
fn mutation_is_relevant(added_text: &[String]) -> bool {
    added_text.iter().any(|text| {
        let lower = text.to_lowercase();
        MUTATION_MARKERS.iter().any(|m| lower.contains(m))
    })
}

/// A navigation is relevant when it lands on a page the pipeline targets.
fn navigation_is_relevant(url: &str) -> bool {
    let path = url::Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_else(|_| url.to_lowercase());
    path == "/" || RELEVANT_PATHS.iter().any(|p| path.contains(p))
}
