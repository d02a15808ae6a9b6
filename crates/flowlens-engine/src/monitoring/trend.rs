use super::snapshot::PerformanceSnapshot;
use super::TimeRange;
use flowlens_core::MetricKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Degrading,
    Stable,
}

/// Direction and rate of change of one metric over a time window, from an
/// ordinary least-squares fit against sample index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceTrend {
    pub metric: MetricKind,
    pub direction: TrendDirection,
    /// Change per sample.
    pub slope: f64,
    pub window: TimeRange,
    /// min(samples / 10, 1).
    pub confidence: f64,
}

/// OLS slope of `ys` against the index sequence 0..n.
fn ols_slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

fn classify(kind: MetricKind, slope: f64, epsilon: f64) -> TrendDirection {
    if slope.abs() < epsilon {
        TrendDirection::Stable
    } else if (slope < 0.0) == kind.lower_is_better() {
        TrendDirection::Improving
    } else {
        TrendDirection::Degrading
    }
}

/// Fit one trend per metric over the snapshots falling inside `window`.
/// Returns an empty list when fewer than `min_samples` fall in the window;
/// thin data degrades to no answer rather than a wrong one.
pub(crate) fn analyze_trends(
    snapshots: &[PerformanceSnapshot],
    window: &TimeRange,
    min_samples: usize,
    epsilon: f64,
) -> Vec<PerformanceTrend> {
    let in_window: Vec<&PerformanceSnapshot> = snapshots
        .iter()
        .filter(|s| window.contains(s.timestamp))
        .collect();
    if in_window.len() < min_samples {
        return Vec::new();
    }
    let confidence = (in_window.len() as f64 / 10.0).min(1.0);

    MetricKind::ALL
        .iter()
        .map(|&kind| {
            let ys: Vec<f64> = in_window.iter().map(|s| s.metrics.get(kind)).collect();
            let slope = ols_slope(&ys);
            PerformanceTrend {
                metric: kind,
                direction: classify(kind, slope, epsilon),
                slope,
                window: *window,
                confidence,
            }
        })
        .collect()
}
