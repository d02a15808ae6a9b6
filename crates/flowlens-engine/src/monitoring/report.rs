use super::anomaly::AnomalyFinding;
use super::alerts::AlertSeverity;
use super::snapshot::PerformanceSnapshot;
use super::trend::{PerformanceTrend, TrendDirection};
use super::TimeRange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate statistics over the snapshots in a report's time range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub sample_count: usize,
    pub avg_execution_time_ms: f64,
    pub avg_cpu_usage: f64,
    pub avg_memory_usage: f64,
    pub avg_throughput: f64,
    pub avg_error_rate: f64,
    pub avg_latency_ms: f64,
    /// Alerts recorded for the workflow within the range.
    pub alert_count: usize,
}

impl ReportSummary {
    pub(crate) fn from_snapshots(snapshots: &[&PerformanceSnapshot], alert_count: usize) -> Self {
        let n = snapshots.len();
        if n == 0 {
            return Self {
                alert_count,
                ..Self::default()
            };
        }
        let avg = |f: fn(&PerformanceSnapshot) -> f64| {
            snapshots.iter().map(|s| f(s)).sum::<f64>() / n as f64
        };
        Self {
            sample_count: n,
            avg_execution_time_ms: avg(|s| s.metrics.execution_time_ms),
            avg_cpu_usage: avg(|s| s.metrics.cpu_usage),
            avg_memory_usage: avg(|s| s.metrics.memory_usage),
            avg_throughput: avg(|s| s.metrics.throughput),
            avg_error_rate: avg(|s| s.metrics.error_rate),
            avg_latency_ms: avg(|s| s.metrics.latency_ms),
            alert_count,
        }
    }
}

/// Summary report for one workflow over a time range: aggregates, trends,
/// anomalies against the current baseline, and rule-based recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub workflow_id: String,
    pub generated_at: DateTime<Utc>,
    pub range: TimeRange,
    pub summary: ReportSummary,
    pub trends: Vec<PerformanceTrend>,
    pub anomalies: Vec<AnomalyFinding>,
    pub recommendations: Vec<String>,
}

/// Fixed recommendation rules applied to a finished summary.
pub(crate) fn build_recommendations(
    summary: &ReportSummary,
    trends: &[PerformanceTrend],
    anomalies: &[AnomalyFinding],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if summary.avg_execution_time_ms > 5000.0 {
        recommendations.push(
            "average execution time exceeds 5s; re-run workflow optimization".to_string(),
        );
    }
    if summary.avg_cpu_usage > 80.0 || summary.avg_memory_usage > 80.0 {
        recommendations
            .push("sustained high resource usage; consider scaling up allocations".to_string());
    }
    if summary.avg_error_rate > 5.0 {
        recommendations
            .push("error rate is elevated across the range; review error handling".to_string());
    }
    for trend in trends {
        if trend.direction == TrendDirection::Degrading && trend.confidence > 0.5 {
            recommendations.push(format!("{} is degrading; investigate recent changes", trend.metric));
        }
    }
    if anomalies.iter().any(|a| a.severity == AlertSeverity::Critical) {
        recommendations.push("critical anomaly detected; investigate immediately".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlens_core::MetricKind;

    #[test]
    fn rules_fire_on_their_thresholds() {
        let summary = ReportSummary {
            sample_count: 10,
            avg_execution_time_ms: 6000.0,
            avg_cpu_usage: 85.0,
            avg_error_rate: 6.0,
            ..ReportSummary::default()
        };
        let trend = PerformanceTrend {
            metric: MetricKind::Latency,
            direction: TrendDirection::Degrading,
            slope: 12.0,
            window: TimeRange::last_hours(1),
            confidence: 0.8,
        };
        let recommendations = build_recommendations(&summary, &[trend], &[]);

        assert_eq!(recommendations.len(), 4);
        assert!(recommendations.iter().any(|r| r.contains("execution time")));
        assert!(recommendations.iter().any(|r| r.contains("latency")));
    }

    #[test]
    fn quiet_summary_yields_no_recommendations() {
        let summary = ReportSummary {
            sample_count: 10,
            avg_execution_time_ms: 1000.0,
            avg_cpu_usage: 40.0,
            avg_memory_usage: 40.0,
            avg_error_rate: 0.5,
            ..ReportSummary::default()
        };
        assert!(build_recommendations(&summary, &[], &[]).is_empty());
    }
}
