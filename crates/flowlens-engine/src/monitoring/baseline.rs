use chrono::{DateTime, Utc};
use flowlens_core::{MetricKind, MetricSample};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistical baseline for one workflow/node key: a rolling mean per
/// metric and a band of allowed deviation (2x standard deviation).
///
/// A `sample_size` of zero marks the fixed default baseline handed out
/// before enough history exists; defaults are never cached, so anomaly
/// detection ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceBaseline {
    pub key: String,
    pub mean: MetricSample,
    /// Allowed absolute deviation from the mean, per metric.
    pub band: MetricSample,
    pub sample_size: usize,
    pub computed_at: DateTime<Utc>,
}

impl PerformanceBaseline {
    /// Fixed fallback used while fewer than the minimum number of
    /// snapshots exist for a key.
    pub fn default_for(key: &str) -> Self {
        Self {
            key: key.to_string(),
            mean: MetricSample {
                execution_time_ms: 3000.0,
                cpu_usage: 50.0,
                memory_usage: 60.0,
                throughput: 100.0,
                error_rate: 1.0,
                latency_ms: 200.0,
            },
            band: MetricSample {
                execution_time_ms: 1000.0,
                cpu_usage: 20.0,
                memory_usage: 20.0,
                throughput: 30.0,
                error_rate: 2.0,
                latency_ms: 100.0,
            },
            sample_size: 0,
            computed_at: Utc::now(),
        }
    }

    /// True for a baseline actually computed from history.
    pub fn is_established(&self) -> bool {
        self.sample_size > 0
    }

    /// Staleness check against the configured TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.computed_at);
        age.to_std().map(|age| age > ttl).unwrap_or(false)
    }

    /// Mean and 2-sigma band over the supplied samples (population
    /// variance). Callers pass the most recent window of history.
    pub(crate) fn compute(key: &str, samples: &[MetricSample]) -> Self {
        let n = samples.len() as f64;
        let mean = MetricSample::from_fn(|kind| {
            samples.iter().map(|s| s.get(kind)).sum::<f64>() / n
        });
        let band = MetricSample::from_fn(|kind| {
            let m = mean.get(kind);
            let variance = samples
                .iter()
                .map(|s| {
                    let d = s.get(kind) - m;
                    d * d
                })
                .sum::<f64>()
                / n;
            2.0 * variance.sqrt()
        });
        Self {
            key: key.to_string(),
            mean,
            band,
            sample_size: samples.len(),
            computed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_sample(cpu: f64) -> MetricSample {
        MetricSample {
            cpu_usage: cpu,
            ..MetricSample::default()
        }
    }

    #[test]
    fn mean_and_band_match_the_window() {
        // Alternating 40/60: mean 50, stddev 10, band 20.
        let samples: Vec<MetricSample> =
            (0..10).map(|i| cpu_sample(if i % 2 == 0 { 40.0 } else { 60.0 })).collect();
        let baseline = PerformanceBaseline::compute("wf1", &samples);

        assert_eq!(baseline.sample_size, 10);
        assert!((baseline.mean.cpu_usage - 50.0).abs() < 1e-9);
        assert!((baseline.band.cpu_usage - 20.0).abs() < 1e-9);
        assert!(baseline.is_established());
    }

    #[test]
    fn constant_history_yields_zero_band() {
        let samples = vec![cpu_sample(55.0); 12];
        let baseline = PerformanceBaseline::compute("wf1", &samples);
        assert_eq!(baseline.band.cpu_usage, 0.0);
    }

    #[test]
    fn default_baseline_is_not_established() {
        let baseline = PerformanceBaseline::default_for("wf1");
        assert!(!baseline.is_established());
        assert_eq!(baseline.mean.execution_time_ms, 3000.0);
        assert!(!baseline.is_expired(Duration::from_secs(600)));
    }
}
