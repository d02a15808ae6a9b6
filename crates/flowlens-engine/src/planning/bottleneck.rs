use super::graph::DependencyGraph;
use super::resources::required_resources;
use flowlens_core::{MetricSample, Workflow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Rule thresholds for the heuristic scorer.
const CPU_BOTTLENECK_UNITS: f64 = 2000.0;
const MEMORY_BOTTLENECK_MB: f64 = 1024.0;
const CHAIN_BOTTLENECK_LEN: usize = 5;
const RESOURCE_DELAY_MS: f64 = 2000.0;
const CHAIN_DELAY_MS: f64 = 1000.0;
const SLOW_HISTORY_MS: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BottleneckSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BottleneckSeverity {
    /// Weight used for the aggregate risk score.
    pub fn weight(&self) -> f64 {
        match self {
            BottleneckSeverity::Low => 1.0,
            BottleneckSeverity::Medium => 3.0,
            BottleneckSeverity::High => 7.0,
            BottleneckSeverity::Critical => 15.0,
        }
    }

    const MAX_WEIGHT: f64 = 15.0;
}

/// One predicted bottleneck. `node_id` is `None` for workflow-level
/// findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bottleneck {
    pub node_id: Option<String>,
    pub severity: BottleneckSeverity,
    pub predicted_delay_ms: f64,
    pub causes: Vec<String>,
    pub mitigations: Vec<String>,
}

/// Output of the bottleneck predictor.
///
/// This is a deterministic rule-based scorer, not a statistical model:
/// resource-hungry nodes and long dependency chains are flagged with fixed
/// severities and stock mitigations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckAnalysis {
    pub workflow_id: String,
    pub bottlenecks: Vec<Bottleneck>,
    /// Normalized severity mass in [0, 1]; 0 when nothing was flagged.
    pub risk_score: f64,
    /// Deduplicated union of all per-finding mitigations, in finding order.
    pub recommendations: Vec<String>,
}

/// Longest dependency chain, found by exhaustive depth-first path
/// enumeration from every root. Exponential in the worst case but the input
/// is a workflow-sized DAG.
fn longest_chain(graph: &DependencyGraph) -> Vec<String> {
    fn walk(graph: &DependencyGraph, node: &str, path: &mut Vec<String>, best: &mut Vec<String>) {
        path.push(node.to_string());
        let dependents = graph.dependents_of(node);
        if dependents.is_empty() {
            if path.len() > best.len() {
                *best = path.clone();
            }
        } else {
            for next in dependents {
                walk(graph, next, path, best);
            }
        }
        path.pop();
    }

    let mut best = Vec::new();
    let mut path = Vec::new();
    for root in graph.roots() {
        walk(graph, root, &mut path, &mut best);
    }
    best
}

pub(crate) fn predict_bottlenecks(
    workflow: &Workflow,
    graph: &DependencyGraph,
    history: &[MetricSample],
) -> BottleneckAnalysis {
    let mut bottlenecks = Vec::new();

    // Rule 1: resource-intensive nodes.
    for node in &workflow.nodes {
        let (cpu, memory, _) = required_resources(node);
        if cpu > CPU_BOTTLENECK_UNITS || memory > MEMORY_BOTTLENECK_MB {
            let mut causes = Vec::new();
            if cpu > CPU_BOTTLENECK_UNITS {
                causes.push(format!("requests {cpu:.0} CPU units"));
            }
            if memory > MEMORY_BOTTLENECK_MB {
                causes.push(format!("requests {memory:.0} MB of memory"));
            }
            bottlenecks.push(Bottleneck {
                node_id: Some(node.id.clone()),
                severity: BottleneckSeverity::High,
                predicted_delay_ms: RESOURCE_DELAY_MS,
                causes,
                mitigations: vec![
                    "split the node into smaller steps".to_string(),
                    "raise the resource allocation for this node".to_string(),
                    "schedule the node when the cluster is idle".to_string(),
                ],
            });
        }
    }

    // Rule 2: the middle of an overly long dependency chain.
    let chain = longest_chain(graph);
    if chain.len() > CHAIN_BOTTLENECK_LEN {
        let middle = chain[chain.len() / 2].clone();
        bottlenecks.push(Bottleneck {
            node_id: Some(middle),
            severity: BottleneckSeverity::Medium,
            predicted_delay_ms: CHAIN_DELAY_MS,
            causes: vec![format!(
                "sits in the middle of a dependency chain of length {}",
                chain.len()
            )],
            mitigations: vec![
                "break the chain by removing unnecessary dependencies".to_string(),
                "merge adjacent lightweight nodes".to_string(),
            ],
        });
    }

    // Rule 3: sustained slow runs in the observed history.
    if !history.is_empty() {
        let mean_execution: f64 = history
            .iter()
            .map(|s| s.execution_time_ms)
            .sum::<f64>()
            / history.len() as f64;
        if mean_execution > SLOW_HISTORY_MS {
            bottlenecks.push(Bottleneck {
                node_id: None,
                severity: BottleneckSeverity::Medium,
                predicted_delay_ms: mean_execution - SLOW_HISTORY_MS,
                causes: vec![format!(
                    "mean observed execution time is {mean_execution:.0} ms over {} runs",
                    history.len()
                )],
                mitigations: vec![
                    "profile recent runs to locate the slow nodes".to_string(),
                    "re-run planning with the current graph".to_string(),
                ],
            });
        }
    }

    let risk_score = if bottlenecks.is_empty() {
        0.0
    } else {
        let total: f64 = bottlenecks.iter().map(|b| b.severity.weight()).sum();
        total / (bottlenecks.len() as f64 * BottleneckSeverity::MAX_WEIGHT)
    };

    let mut seen = HashSet::new();
    let recommendations = bottlenecks
        .iter()
        .flat_map(|b| b.mitigations.iter())
        .filter(|m| seen.insert(m.as_str().to_string()))
        .cloned()
        .collect();

    BottleneckAnalysis {
        workflow_id: workflow.id.clone(),
        bottlenecks,
        risk_score,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlens_core::{NodeKind, WorkflowNode};
    use serde_json::json;

    #[test]
    fn resource_hungry_node_is_flagged_high() {
        let wf = Workflow::new("wf")
            .with_node(WorkflowNode::new("big", NodeKind::Action).with_data("cpu", json!(2500)))
            .with_node(WorkflowNode::new("small", NodeKind::Action));
        let graph = DependencyGraph::build(&wf).unwrap();

        let analysis = predict_bottlenecks(&wf, &graph, &[]);
        assert_eq!(analysis.bottlenecks.len(), 1);
        let finding = &analysis.bottlenecks[0];
        assert_eq!(finding.node_id.as_deref(), Some("big"));
        assert_eq!(finding.severity, BottleneckSeverity::High);
        assert_eq!(finding.predicted_delay_ms, 2000.0);
        assert!((analysis.risk_score - 7.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn long_chain_flags_its_middle_node() {
        let ids = ["n0", "n1", "n2", "n3", "n4", "n5"];
        let mut wf = Workflow::new("wf");
        for id in ids {
            wf.nodes.push(WorkflowNode::new(id, NodeKind::Condition));
        }
        for pair in ids.windows(2) {
            wf = wf.with_edge(pair[0], pair[1]);
        }
        let graph = DependencyGraph::build(&wf).unwrap();

        let analysis = predict_bottlenecks(&wf, &graph, &[]);
        assert_eq!(analysis.bottlenecks.len(), 1);
        assert_eq!(analysis.bottlenecks[0].node_id.as_deref(), Some("n3"));
        assert_eq!(analysis.bottlenecks[0].severity, BottleneckSeverity::Medium);
    }

    #[test]
    fn slow_history_adds_a_workflow_level_finding() {
        let wf = Workflow::new("wf").with_node(WorkflowNode::new("a", NodeKind::Action));
        let graph = DependencyGraph::build(&wf).unwrap();
        let slow = MetricSample {
            execution_time_ms: 9000.0,
            ..MetricSample::default()
        };

        let analysis = predict_bottlenecks(&wf, &graph, &[slow, slow]);
        assert_eq!(analysis.bottlenecks.len(), 1);
        assert!(analysis.bottlenecks[0].node_id.is_none());
        assert_eq!(analysis.bottlenecks[0].predicted_delay_ms, 4000.0);
    }

    #[test]
    fn recommendations_are_deduplicated() {
        let wf = Workflow::new("wf")
            .with_node(WorkflowNode::new("a", NodeKind::Action).with_data("cpu", json!(3000)))
            .with_node(WorkflowNode::new("b", NodeKind::Action).with_data("cpu", json!(3000)));
        let graph = DependencyGraph::build(&wf).unwrap();

        let analysis = predict_bottlenecks(&wf, &graph, &[]);
        assert_eq!(analysis.bottlenecks.len(), 2);
        assert_eq!(analysis.recommendations.len(), 3);
    }
}
