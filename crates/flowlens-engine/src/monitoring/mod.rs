//! Observation half of the engine: bounded snapshot histories, statistical
//! baselines, anomaly and trend detection, and alert/report aggregation.
//!
//! All mutable state lives inside a [`PerformanceTracker`] instance rather
//! than module-level globals, so independent engines (one per tenant, one
//! per test) never interfere.

pub mod alerts;
pub mod anomaly;
pub mod baseline;
pub mod report;
pub mod snapshot;
pub mod source;
pub mod tracker;
pub mod trend;

pub use alerts::{AlertSeverity, AlertType, PerformanceAlert};
pub use anomaly::AnomalyFinding;
pub use baseline::PerformanceBaseline;
pub use report::{PerformanceReport, ReportSummary};
pub use snapshot::{PerformanceSnapshot, SnapshotMetadata};
pub use source::{MetricsSource, SimulatedMetricsSource};
pub use tracker::PerformanceTracker;
pub use trend::{PerformanceTrend, TrendDirection};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// Closed time interval used by trend analysis and reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The window ending now and reaching `hours` back.
    pub fn last_hours(hours: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - ChronoDuration::hours(hours),
            end,
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}
