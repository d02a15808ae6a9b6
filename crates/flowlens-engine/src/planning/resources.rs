use flowlens_core::{MetricKind, NodeKind, Workflow, WorkflowNode};
use serde::{Deserialize, Serialize};

/// Defaults applied when a node carries no explicit resource hints.
pub const DEFAULT_CPU_UNITS: f64 = 1000.0;
pub const DEFAULT_MEMORY_MB: f64 = 512.0;
pub const DEFAULT_STORAGE_MB: f64 = 100.0;

// Static headroom reclamation, not a solver: CPU and memory requests are
// discounted by a fixed factor, storage is left as requested.
const CPU_EFFICIENCY: f64 = 0.9;
const MEMORY_EFFICIENCY: f64 = 0.95;

const CPU_COST_PER_UNIT: f64 = 0.001;
const MEMORY_COST_PER_MB: f64 = 0.0005;
const STORAGE_COST_PER_MB: f64 = 0.0001;

/// Per-node resource assignment after the efficiency discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    pub node_id: String,
    pub cpu: f64,
    pub memory: f64,
    pub storage: f64,
    /// 1-10; higher runs first under contention.
    pub priority: u8,
}

/// Aggregate cpu/memory/storage triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateResources {
    pub cpu: f64,
    pub memory: f64,
    pub storage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingAction {
    ScaleUp,
    ScaleDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    Above,
    Below,
}

/// One metric/threshold rule in the scaling plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingTrigger {
    pub metric: MetricKind,
    pub threshold: f64,
    pub direction: ThresholdDirection,
    pub action: ScalingAction,
    /// Fraction of the current allocation to add or remove.
    pub amount: f64,
}

/// Initial allocation, the triggers that move it, and its ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPlan {
    pub initial: AggregateResources,
    pub triggers: Vec<ScalingTrigger>,
    pub max: AggregateResources,
}

/// Resource plan for one workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePlan {
    pub workflow_id: String,
    pub allocations: Vec<ResourceAllocation>,
    pub scaling: ScalingPlan,
    pub estimated_cost: f64,
    /// Sum of optimized allocations over the sum requested; strictly below
    /// 1 with the documented discount factors.
    pub efficiency: f64,
}

fn node_priority(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::Start | NodeKind::End => 10,
        NodeKind::Action => 8,
        NodeKind::Loop => 7,
        NodeKind::Condition => 6,
        _ => 5,
    }
}

/// Resources a node asks for, before the efficiency discount.
pub(crate) fn required_resources(node: &WorkflowNode) -> (f64, f64, f64) {
    (
        node.cpu_hint().unwrap_or(DEFAULT_CPU_UNITS),
        node.memory_hint().unwrap_or(DEFAULT_MEMORY_MB),
        node.storage_hint().unwrap_or(DEFAULT_STORAGE_MB),
    )
}

pub(crate) fn optimize_resources(workflow: &Workflow) -> ResourcePlan {
    let mut allocations = Vec::with_capacity(workflow.nodes.len());
    let mut required_total = 0.0;
    let mut optimized_total = 0.0;
    let mut initial = AggregateResources {
        cpu: 0.0,
        memory: 0.0,
        storage: 0.0,
    };
    let mut estimated_cost = 0.0;

    for node in &workflow.nodes {
        let (cpu_req, mem_req, storage_req) = required_resources(node);
        let cpu = cpu_req * CPU_EFFICIENCY;
        let memory = mem_req * MEMORY_EFFICIENCY;
        let storage = storage_req;

        required_total += cpu_req + mem_req + storage_req;
        optimized_total += cpu + memory + storage;
        initial.cpu += cpu;
        initial.memory += memory;
        initial.storage += storage;
        estimated_cost +=
            cpu * CPU_COST_PER_UNIT + memory * MEMORY_COST_PER_MB + storage * STORAGE_COST_PER_MB;

        allocations.push(ResourceAllocation {
            node_id: node.id.clone(),
            cpu,
            memory,
            storage,
            priority: node_priority(&node.kind),
        });
    }

    let triggers = vec![
        ScalingTrigger {
            metric: MetricKind::CpuUsage,
            threshold: 80.0,
            direction: ThresholdDirection::Above,
            action: ScalingAction::ScaleUp,
            amount: 0.5,
        },
        ScalingTrigger {
            metric: MetricKind::MemoryUsage,
            threshold: 85.0,
            direction: ThresholdDirection::Above,
            action: ScalingAction::ScaleUp,
            amount: 0.3,
        },
        ScalingTrigger {
            metric: MetricKind::CpuUsage,
            threshold: 30.0,
            direction: ThresholdDirection::Below,
            action: ScalingAction::ScaleDown,
            amount: 0.2,
        },
    ];

    let max = AggregateResources {
        cpu: initial.cpu * 3.0,
        memory: initial.memory * 2.0,
        storage: initial.storage * 1.5,
    };

    let efficiency = if required_total > 0.0 {
        optimized_total / required_total
    } else {
        1.0
    };

    ResourcePlan {
        workflow_id: workflow.id.clone(),
        allocations,
        scaling: ScalingPlan {
            initial,
            triggers,
            max,
        },
        estimated_cost,
        efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_and_discounts_apply() {
        let wf = Workflow::new("wf").with_node(WorkflowNode::new("a", NodeKind::Action));
        let plan = optimize_resources(&wf);

        let alloc = &plan.allocations[0];
        assert_eq!(alloc.cpu, DEFAULT_CPU_UNITS * 0.9);
        assert_eq!(alloc.memory, DEFAULT_MEMORY_MB * 0.95);
        assert_eq!(alloc.storage, DEFAULT_STORAGE_MB);
        assert_eq!(alloc.priority, 8);
        assert!(plan.efficiency < 1.0);
        assert!(plan.efficiency > 0.0);
    }

    #[test]
    fn hints_override_defaults_and_drive_cost() {
        let wf = Workflow::new("wf").with_node(
            WorkflowNode::new("heavy", NodeKind::Loop)
                .with_data("cpu", json!(4000))
                .with_data("memory", json!(2048))
                .with_data("storage", json!(500)),
        );
        let plan = optimize_resources(&wf);
        let alloc = &plan.allocations[0];

        assert_eq!(alloc.cpu, 3600.0);
        assert_eq!(alloc.memory, 2048.0 * 0.95);
        assert_eq!(alloc.priority, 7);

        let expected_cost =
            alloc.cpu * 0.001 + alloc.memory * 0.0005 + alloc.storage * 0.0001;
        assert!((plan.estimated_cost - expected_cost).abs() < 1e-9);

        assert_eq!(plan.scaling.max.cpu, plan.scaling.initial.cpu * 3.0);
        assert_eq!(plan.scaling.max.memory, plan.scaling.initial.memory * 2.0);
        assert_eq!(plan.scaling.max.storage, plan.scaling.initial.storage * 1.5);
        assert_eq!(plan.scaling.triggers.len(), 3);
    }
}
