use super::graph::DependencyGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// How a runtime should walk the parallel groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Wide graphs: drain each group fully before moving on.
    BreadthFirst,
    /// Strictly sequential graphs: follow chains node by node.
    DepthFirst,
    /// Mixed shapes: let the runtime interleave groups.
    Optimal,
}

/// A set of nodes with no dependency relation between any two members, so
/// all of them may execute concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelGroup {
    pub id: String,
    pub members: Vec<String>,
    /// Concurrency bound: group size capped by the configured maximum.
    pub max_concurrency: usize,
    /// Wall-clock estimate for the group: its heaviest member.
    pub estimated_time_ms: f64,
}

/// Parallelization plan for one workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelExecutionPlan {
    pub workflow_id: String,
    pub groups: Vec<ParallelGroup>,
    /// Node id -> ids it depends on, for runtimes that re-check ordering.
    pub dependency_map: HashMap<String, Vec<String>>,
    pub strategy: ExecutionStrategy,
}

/// Greedy independence grouping.
///
/// Iterates nodes in topological order; each unplaced node seeds a group,
/// then every later unplaced node with no direct or transitive dependency
/// relation to any current member joins it. This yields *a* valid partition,
/// not a minimal one - reachability checks make it O(n^2) per group, which
/// is fine at workflow scale.
pub(crate) fn plan_parallel_groups(
    graph: &DependencyGraph,
    weights: &HashMap<String, f64>,
    max_parallel: usize,
) -> Vec<ParallelGroup> {
    let order = graph.topological_order();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();

    for (i, seed) in order.iter().enumerate() {
        if placed.contains(seed.as_str()) {
            continue;
        }
        let mut members = vec![seed.clone()];
        placed.insert(seed.as_str());

        for candidate in &order[i + 1..] {
            if placed.contains(candidate.as_str()) {
                continue;
            }
            let independent = members.iter().all(|m| !graph.related(m, candidate));
            if independent {
                members.push(candidate.clone());
                placed.insert(candidate.as_str());
            }
        }

        let estimated_time_ms = members
            .iter()
            .map(|m| weights.get(m).copied().unwrap_or(0.0))
            .fold(0.0, f64::max);
        let max_concurrency = members.len().min(max_parallel.max(1));
        groups.push(ParallelGroup {
            id: Uuid::new_v4().to_string(),
            members,
            max_concurrency,
            estimated_time_ms,
        });
    }

    groups
}

/// Strategy selection from aggregate group-size statistics: wide groups
/// favor breadth-first, all-singleton partitions are inherently sequential,
/// anything in between is left to the runtime.
pub(crate) fn select_strategy(groups: &[ParallelGroup]) -> ExecutionStrategy {
    if groups.is_empty() {
        return ExecutionStrategy::Optimal;
    }
    let total_members: usize = groups.iter().map(|g| g.members.len()).sum();
    let mean_size = total_members as f64 / groups.len() as f64;
    if mean_size >= 3.0 {
        ExecutionStrategy::BreadthFirst
    } else if groups.iter().all(|g| g.members.len() == 1) {
        ExecutionStrategy::DepthFirst
    } else {
        ExecutionStrategy::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(members: &[&str]) -> ParallelGroup {
        ParallelGroup {
            id: "g".to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            max_concurrency: members.len(),
            estimated_time_ms: 0.0,
        }
    }

    #[test]
    fn strategy_follows_group_shape() {
        assert_eq!(
            select_strategy(&[group(&["a", "b", "c"]), group(&["d", "e", "f"])]),
            ExecutionStrategy::BreadthFirst
        );
        assert_eq!(
            select_strategy(&[group(&["a"]), group(&["b"])]),
            ExecutionStrategy::DepthFirst
        );
        assert_eq!(
            select_strategy(&[group(&["a", "b"]), group(&["c"])]),
            ExecutionStrategy::Optimal
        );
    }
}
