use anyhow::Result;
use async_trait::async_trait;
use flowlens_core::MetricSample;
use rand::Rng;

/// Boundary to the external metrics/telemetry system.
///
/// The engine performs exactly one read per snapshot with no retry or
/// backoff; resilience at this boundary belongs to the implementation.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn read(&self, workflow_id: &str, node_id: Option<&str>) -> Result<MetricSample>;
}

/// Development stand-in that jitters around plausible values. Production
/// deployments must inject a real source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedMetricsSource;

#[async_trait]
impl MetricsSource for SimulatedMetricsSource {
    async fn read(&self, _workflow_id: &str, _node_id: Option<&str>) -> Result<MetricSample> {
        let mut rng = rand::thread_rng();
        Ok(MetricSample {
            execution_time_ms: rng.gen_range(1000.0..6000.0),
            cpu_usage: rng.gen_range(10.0..95.0),
            memory_usage: rng.gen_range(20.0..90.0),
            throughput: rng.gen_range(50.0..200.0),
            error_rate: rng.gen_range(0.0..8.0),
            latency_ms: rng.gen_range(20.0..500.0),
        })
    }
}
