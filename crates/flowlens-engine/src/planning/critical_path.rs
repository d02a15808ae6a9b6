use super::graph::DependencyGraph;
use super::parallel::ParallelGroup;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Execution plan for one workflow: a valid linear order, the parallel
/// groups, the critical path through the weighted DAG and the confidence in
/// the estimate.
///
/// The plan is an immutable value computed for the graph as supplied; it is
/// not cached, so callers must request a fresh plan after mutating the
/// workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub workflow_id: String,
    /// Topological order over the full node set.
    pub optimal_order: Vec<String>,
    /// Member ids of each parallel group, in planning order.
    pub parallel_groups: Vec<Vec<String>>,
    /// Node ids along the longest weighted path, in execution order.
    pub critical_path: Vec<String>,
    /// Sum of node weights along the critical path, in milliseconds.
    pub estimated_time_ms: f64,
    /// In [0, 1]; grows with snapshot history, shrinks with graph size.
    pub confidence: f64,
}

/// Longest weighted path through the DAG.
///
/// Walks the topological order accumulating
/// `distance[n] = weight[n] + max(distance over dependencies)` with a
/// predecessor pointer per node; the critical path is the predecessor chain
/// ending at the node with the maximum distance. Weights are strictly
/// positive by construction so no cycle or negative-weight handling is
/// needed beyond the DAG guarantee.
pub(crate) fn longest_path(
    graph: &DependencyGraph,
    weights: &HashMap<String, f64>,
) -> (Vec<String>, f64) {
    let order = graph.topological_order();
    let mut distance: HashMap<&str, f64> = HashMap::with_capacity(order.len());
    let mut predecessor: HashMap<&str, &str> = HashMap::new();

    for id in &order {
        let weight = weights.get(id).copied().unwrap_or(0.0);
        let mut best_dep: Option<(&str, f64)> = None;
        for dep in graph.dependencies_of(id) {
            let dep_distance = distance.get(dep.as_str()).copied().unwrap_or(0.0);
            if best_dep.map_or(true, |(_, d)| dep_distance > d) {
                best_dep = Some((dep.as_str(), dep_distance));
            }
        }
        let base = best_dep.map(|(_, d)| d).unwrap_or(0.0);
        distance.insert(id.as_str(), base + weight);
        if let Some((dep, _)) = best_dep {
            predecessor.insert(id.as_str(), dep);
        }
    }

    // Endpoint with the maximum distance; first in topological order wins
    // ties so the result is deterministic.
    let mut end: Option<(&str, f64)> = None;
    for id in &order {
        let d = distance[id.as_str()];
        if end.map_or(true, |(_, best)| d > best) {
            end = Some((id.as_str(), d));
        }
    }

    let (mut current, total) = match end {
        Some((id, d)) => (id, d),
        None => return (Vec::new(), 0.0),
    };

    let mut path = vec![current.to_string()];
    while let Some(&prev) = predecessor.get(current) {
        path.push(prev.to_string());
        current = prev;
    }
    path.reverse();
    (path, total)
}

/// Confidence in a plan: more history raises it, larger graphs lower it.
pub(crate) fn plan_confidence(historical_samples: usize, node_count: usize) -> f64 {
    let history_factor = (historical_samples as f64 / 10.0).min(1.0);
    let size_factor = 1.0 / (1.0 + node_count as f64 / 100.0);
    history_factor * size_factor
}

pub(crate) fn build_execution_plan(
    workflow_id: &str,
    graph: &DependencyGraph,
    weights: &HashMap<String, f64>,
    groups: &[ParallelGroup],
    historical_samples: usize,
) -> ExecutionPlan {
    let (critical_path, estimated_time_ms) = longest_path(graph, weights);
    ExecutionPlan {
        workflow_id: workflow_id.to_string(),
        optimal_order: graph.topological_order(),
        parallel_groups: groups.iter().map(|g| g.members.clone()).collect(),
        critical_path,
        estimated_time_ms,
        confidence: plan_confidence(historical_samples, graph.node_ids().len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlens_core::{NodeKind, Workflow, WorkflowNode};

    fn chain_workflow() -> Workflow {
        Workflow::new("wf")
            .with_node(WorkflowNode::new("a", NodeKind::Action))
            .with_node(WorkflowNode::new("b", NodeKind::Action))
            .with_node(WorkflowNode::new("c", NodeKind::Action))
            .with_edge("a", "b")
            .with_edge("b", "c")
    }

    #[test]
    fn linear_chain_takes_the_whole_graph() {
        let wf = chain_workflow();
        let graph = DependencyGraph::build(&wf).unwrap();
        let weights = super::super::weights::estimate_weights(&wf.nodes);

        let (path, total) = longest_path(&graph, &weights);
        assert_eq!(path, ["a", "b", "c"]);
        assert_eq!(total, 6000.0);
    }

    #[test]
    fn heavier_branch_wins() {
        let wf = Workflow::new("wf")
            .with_node(WorkflowNode::new("fast", NodeKind::Condition))
            .with_node(WorkflowNode::new("slow", NodeKind::Loop))
            .with_node(WorkflowNode::new("join", NodeKind::Action))
            .with_edge("fast", "join")
            .with_edge("slow", "join");
        let graph = DependencyGraph::build(&wf).unwrap();
        let weights = super::super::weights::estimate_weights(&wf.nodes);

        let (path, total) = longest_path(&graph, &weights);
        assert_eq!(path, ["slow", "join"]);
        assert_eq!(total, 5000.0 + 2000.0);
    }

    #[test]
    fn confidence_scales_with_history_and_graph_size() {
        assert_eq!(plan_confidence(0, 10), 0.0);
        assert!((plan_confidence(10, 0) - 1.0).abs() < 1e-9);
        assert!((plan_confidence(5, 100) - 0.5 * 0.5).abs() < 1e-9);
        assert!(plan_confidence(20, 10) <= 1.0);
    }
}
