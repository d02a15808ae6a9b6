use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the analysis engine.
///
/// The defaults reproduce the documented behavior: histories and the alert
/// log capped at 1000 entries, baselines computed from the most recent 50
/// snapshots once 10 exist, trends fitted over at least 5 samples, and the
/// fixed threshold alerts at cpu > 90%, memory > 85%, error rate > 5%.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum snapshots retained per workflow/node key (FIFO eviction).
    pub history_cap: usize,
    /// Maximum alerts retained globally (FIFO eviction).
    pub alert_cap: usize,
    /// Snapshots required before a baseline is computed and cached.
    pub baseline_min_samples: usize,
    /// Number of most-recent snapshots a baseline is computed over.
    pub baseline_window: usize,
    /// Age after which a cached baseline is recomputed on next access.
    pub baseline_ttl: Duration,
    /// Samples required inside a window before trends are fitted.
    pub trend_min_samples: usize,
    /// Absolute slope below which a trend is classified as stable.
    pub stable_slope_epsilon: f64,
    /// Upper bound on per-group concurrency in parallel plans.
    pub max_parallel_tasks: usize,
    /// Lookback window for the active-alerts query.
    pub active_alert_window: Duration,
    /// Fixed snapshot threshold: CPU percentage above which a high-severity
    /// alert fires.
    pub cpu_alert_threshold: f64,
    /// Fixed snapshot threshold: memory percentage.
    pub memory_alert_threshold: f64,
    /// Fixed snapshot threshold: error-rate percentage (critical severity).
    pub error_rate_alert_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_cap: 1000,
            alert_cap: 1000,
            baseline_min_samples: 10,
            baseline_window: 50,
            baseline_ttl: Duration::from_secs(600),
            trend_min_samples: 5,
            stable_slope_epsilon: 0.01,
            max_parallel_tasks: 6,
            active_alert_window: Duration::from_secs(24 * 60 * 60),
            cpu_alert_threshold: 90.0,
            memory_alert_threshold: 85.0,
            error_rate_alert_threshold: 5.0,
        }
    }
}
