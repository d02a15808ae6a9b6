use flowlens_core::{NodeKind, WorkflowNode};
use std::collections::HashMap;

/// Synthetic execution-time estimate for a single node, in milliseconds.
///
/// Base weight comes from the node's type tag and is scaled by the declared
/// `complexity` multiplier when one is present. Non-positive or non-finite
/// multipliers are ignored so weights stay strictly positive.
pub fn node_weight(node: &WorkflowNode) -> f64 {
    let base = match node.kind {
        NodeKind::Action => 2000.0,
        NodeKind::Condition => 500.0,
        NodeKind::Loop => 5000.0,
        NodeKind::Parallel => 1500.0,
        _ => 1000.0,
    };
    match node.complexity() {
        Some(c) if c.is_finite() && c > 0.0 => base * c,
        _ => base,
    }
}

/// Estimated weight per node id.
pub fn estimate_weights(nodes: &[WorkflowNode]) -> HashMap<String, f64> {
    nodes
        .iter()
        .map(|n| (n.id.clone(), node_weight(n)))
        .collect()
}
