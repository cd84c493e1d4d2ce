//! Configuration for the extraction pipeline.

use std::time::Duration;

/// Tunable parameters for the orchestrator and scheduler.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum time between two extraction runs, independent of trigger
    /// count. Default: 8s.
    pub cooldown: Duration,

    /// Settle delay after a trigger before a run starts, so a burst of DOM
    /// updates collapses into one run. Default: 1.5s.
    pub settle_delay: Duration,

    /// Byte budget for serialized page content sent to the inference
    /// service; oversized content is truncated with a marker.
    /// Default: 50 KB.
    pub max_content_bytes: usize,

    /// Result cache capacity (entries). Default: 10.
    pub cache_capacity: usize,

    /// Result cache entry lifetime. Default: 5 min.
    pub cache_max_age: Duration,

    /// Most-recent record count retained by the store. Default: 500.
    pub retention_cap: usize,

    /// Staged delays after initial page load, to catch fast, normal, and
    /// slow hydration. Default: 1s, 4s, 10s.
    pub load_stage_delays: Vec<Duration>,

    /// Confidence assigned to heuristic extraction, below the AI path's
    /// typical confidence. Default: 0.5.
    pub heuristic_confidence: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(8),
            settle_delay: Duration::from_millis(1500),
            max_content_bytes: 50_000,
            cache_capacity: 10,
            cache_max_age: Duration::from_secs(300),
            retention_cap: 500,
            load_stage_delays: vec![
                Duration::from_secs(1),
                Duration::from_secs(4),
                Duration::from_secs(10),
            ],
            heuristic_confidence: 0.5,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cooldown interval.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the trigger settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the serialized-content byte budget.
    pub fn with_max_content_bytes(mut self, budget: usize) -> Self {
        self.max_content_bytes = budget;
        self
    }

    /// Set the result cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the store retention cap.
    pub fn with_retention_cap(mut self, cap: usize) -> Self {
        self.retention_cap = cap;
        self
    }

    /// Set the staged post-load delays.
    pub fn with_load_stage_delays(mut self, delays: Vec<Duration>) -> Self {
        self.load_stage_delays = delays;
        self
    }
}
