//! FlowLens workflow optimization and performance analysis engine.
//!
//! The engine has two halves that share the data model from
//! [`flowlens_core`]:
//!
//! - [`planning`] turns a workflow graph into execution, parallelization,
//!   resource and bottleneck plans. Every planning pass is a pure,
//!   synchronous computation over a read-only graph.
//! - [`monitoring`] samples runtime metrics into bounded per-key histories,
//!   maintains statistical baselines, detects anomalies and trends, and
//!   aggregates alerts and reports. Its state is owned by a
//!   [`monitoring::PerformanceTracker`] instance so independent engines can
//!   coexist in one process.
//!
//! The engine never executes workflow nodes, never persists anything and
//! has no network surface; callers hand it graph values and metric readings
//! and consume the plans and reports it returns.

pub mod monitoring;
pub mod planning;

pub use flowlens_core::{EngineConfig, EngineError, MetricKind, MetricSample};
pub use monitoring::{
    MetricsSource, PerformanceAlert, PerformanceBaseline, PerformanceReport, PerformanceSnapshot,
    PerformanceTracker, PerformanceTrend, SimulatedMetricsSource, TimeRange,
};
pub use planning::{
    BottleneckAnalysis, DependencyGraph, ExecutionPlan, ParallelExecutionPlan, ResourcePlan,
    WorkflowOptimizer,
};
