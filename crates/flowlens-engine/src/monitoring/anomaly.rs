use super::alerts::AlertSeverity;
use super::baseline::PerformanceBaseline;
use flowlens_core::{MetricKind, MetricSample};
use serde::{Deserialize, Serialize};

/// One metric deviating beyond its baseline band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub metric: MetricKind,
    pub value: f64,
    pub baseline_mean: f64,
    pub band: f64,
    pub severity: AlertSeverity,
}

/// Compare a fresh sample against an established baseline, one finding per
/// metric whose absolute deviation exceeds the band. Deviations beyond
/// twice the band escalate to high severity; error-rate anomalies are
/// always high. Distinct from the fixed-threshold alerts, which need no
/// baseline.
pub(crate) fn detect_anomalies(
    sample: &MetricSample,
    baseline: &PerformanceBaseline,
) -> Vec<AnomalyFinding> {
    if !baseline.is_established() {
        return Vec::new();
    }
    MetricKind::ALL
        .iter()
        .filter_map(|&kind| {
            let value = sample.get(kind);
            let mean = baseline.mean.get(kind);
            let band = baseline.band.get(kind);
            let deviation = (value - mean).abs();
            if deviation <= band {
                return None;
            }
            let severity = if kind == MetricKind::ErrorRate || deviation > 2.0 * band {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            Some(AnomalyFinding {
                metric: kind,
                value,
                baseline_mean: mean,
                band,
                severity,
            })
        })
        .collect()
}
