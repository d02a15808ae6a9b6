use serde::{Deserialize, Serialize};

/// The fixed tuple of runtime metrics sampled for a workflow or node.
///
/// `cpu_usage`, `memory_usage` and `error_rate` are percentages;
/// `throughput` is items per second.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub execution_time_ms: f64,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub throughput: f64,
    pub error_rate: f64,
    pub latency_ms: f64,
}

impl MetricSample {
    /// Value of a single metric from the tuple.
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::ExecutionTime => self.execution_time_ms,
            MetricKind::CpuUsage => self.cpu_usage,
            MetricKind::MemoryUsage => self.memory_usage,
            MetricKind::Throughput => self.throughput,
            MetricKind::ErrorRate => self.error_rate,
            MetricKind::Latency => self.latency_ms,
        }
    }

    /// Build a sample by evaluating `f` once per metric kind. Used by the
    /// baseline math, which computes each metric's statistic independently.
    pub fn from_fn(mut f: impl FnMut(MetricKind) -> f64) -> Self {
        Self {
            execution_time_ms: f(MetricKind::ExecutionTime),
            cpu_usage: f(MetricKind::CpuUsage),
            memory_usage: f(MetricKind::MemoryUsage),
            throughput: f(MetricKind::Throughput),
            error_rate: f(MetricKind::ErrorRate),
            latency_ms: f(MetricKind::Latency),
        }
    }
}

/// Identifies one metric within [`MetricSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ExecutionTime,
    CpuUsage,
    MemoryUsage,
    Throughput,
    ErrorRate,
    Latency,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::ExecutionTime,
        MetricKind::CpuUsage,
        MetricKind::MemoryUsage,
        MetricKind::Throughput,
        MetricKind::ErrorRate,
        MetricKind::Latency,
    ];

    /// Whether a falling value of this metric is an improvement.
    pub fn lower_is_better(&self) -> bool {
        matches!(
            self,
            MetricKind::ExecutionTime | MetricKind::Latency | MetricKind::ErrorRate
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::ExecutionTime => "execution_time",
            MetricKind::CpuUsage => "cpu_usage",
            MetricKind::MemoryUsage => "memory_usage",
            MetricKind::Throughput => "throughput",
            MetricKind::ErrorRate => "error_rate",
            MetricKind::Latency => "latency",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_from_fn_agree_on_every_kind() {
        let sample = MetricSample {
            execution_time_ms: 1.0,
            cpu_usage: 2.0,
            memory_usage: 3.0,
            throughput: 4.0,
            error_rate: 5.0,
            latency_ms: 6.0,
        };
        let rebuilt = MetricSample::from_fn(|kind| sample.get(kind));
        assert_eq!(sample, rebuilt);
    }

    #[test]
    fn polarity_marks_time_and_error_metrics_lower_is_better() {
        assert!(MetricKind::ExecutionTime.lower_is_better());
        assert!(MetricKind::Latency.lower_is_better());
        assert!(MetricKind::ErrorRate.lower_is_better());
        assert!(!MetricKind::Throughput.lower_is_better());
        assert!(!MetricKind::CpuUsage.lower_is_better());
    }
}
