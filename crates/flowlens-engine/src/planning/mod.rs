//! Planning half of the engine: pure, synchronous analysis of a workflow
//! DAG into execution, parallelization, resource and bottleneck plans.
//!
//! Nothing in this module suspends or mutates shared state; every pass
//! reads the supplied graph and returns an immutable plan value, so the
//! optimizer is safe to call from any thread.

pub mod bottleneck;
pub mod critical_path;
pub mod graph;
pub mod parallel;
pub mod resources;
pub mod weights;

pub use bottleneck::{Bottleneck, BottleneckAnalysis, BottleneckSeverity};
pub use critical_path::ExecutionPlan;
pub use graph::DependencyGraph;
pub use parallel::{ExecutionStrategy, ParallelExecutionPlan, ParallelGroup};
pub use resources::{
    AggregateResources, ResourceAllocation, ResourcePlan, ScalingAction, ScalingPlan,
    ScalingTrigger, ThresholdDirection,
};
pub use weights::{estimate_weights, node_weight};

use flowlens_core::{EngineConfig, EngineError, MetricSample, Workflow};

/// Facade over the planning passes, holding the engine configuration.
///
/// Plans are computed per call and never cached; after the caller mutates a
/// workflow it must request a fresh plan.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptimizer {
    config: EngineConfig,
}

impl WorkflowOptimizer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Full execution plan: topological order, parallel groups, critical
    /// path and a confidence score. `historical_samples` is the number of
    /// performance snapshots recorded for this workflow; more history means
    /// higher confidence in the weight estimates.
    pub fn generate_execution_plan(
        &self,
        workflow: &Workflow,
        historical_samples: usize,
    ) -> Result<ExecutionPlan, EngineError> {
        let graph = DependencyGraph::build(workflow)?;
        let weights = estimate_weights(&workflow.nodes);
        let groups =
            parallel::plan_parallel_groups(&graph, &weights, self.config.max_parallel_tasks);
        Ok(critical_path::build_execution_plan(
            &workflow.id,
            &graph,
            &weights,
            &groups,
            historical_samples,
        ))
    }

    /// Parallelization plan: independent groups with concurrency bounds,
    /// the dependency map, and a strategy picked from the group shape.
    pub fn plan_parallel_execution(
        &self,
        workflow: &Workflow,
    ) -> Result<ParallelExecutionPlan, EngineError> {
        let graph = DependencyGraph::build(workflow)?;
        let weights = estimate_weights(&workflow.nodes);
        let groups =
            parallel::plan_parallel_groups(&graph, &weights, self.config.max_parallel_tasks);
        let strategy = parallel::select_strategy(&groups);
        Ok(ParallelExecutionPlan {
            workflow_id: workflow.id.clone(),
            dependency_map: graph.dependency_map().clone(),
            groups,
            strategy,
        })
    }

    /// Per-node allocations, scaling plan, cost estimate and efficiency.
    pub fn optimize_resources(&self, workflow: &Workflow) -> Result<ResourcePlan, EngineError> {
        if workflow.nodes.is_empty() {
            return Err(EngineError::EmptyWorkflow(workflow.id.clone()));
        }
        Ok(resources::optimize_resources(workflow))
    }

    /// Heuristic bottleneck prediction. `history` is the workflow's recent
    /// snapshot metric history; pass an empty slice when none is available.
    pub fn predict_bottlenecks(
        &self,
        workflow: &Workflow,
        history: &[MetricSample],
    ) -> Result<BottleneckAnalysis, EngineError> {
        let graph = DependencyGraph::build(workflow)?;
        Ok(bottleneck::predict_bottlenecks(workflow, &graph, history))
    }
}
