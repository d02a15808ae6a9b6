use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Type tag of a workflow node. The tag drives weight estimation and
/// resource priority; anything outside the well-known set is carried
/// through as [`NodeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Action,
    Condition,
    Loop,
    Parallel,
    #[serde(untagged)]
    Other(String),
}

/// A single node in a workflow graph.
///
/// The `data` bag is free-form; the engine only inspects the optional
/// numeric keys exposed through the typed accessors below and never
/// mutates a supplied node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            data: HashMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    fn numeric(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(Value::as_f64)
    }

    /// Declared complexity multiplier, if the editor supplied one.
    pub fn complexity(&self) -> Option<f64> {
        self.numeric("complexity")
    }

    /// Explicit CPU requirement hint in compute units.
    pub fn cpu_hint(&self) -> Option<f64> {
        self.numeric("cpu")
    }

    /// Explicit memory requirement hint in MB.
    pub fn memory_hint(&self) -> Option<f64> {
        self.numeric("memory")
    }

    /// Explicit storage requirement hint in MB.
    pub fn storage_hint(&self) -> Option<f64> {
        self.numeric("storage")
    }
}

/// Directed edge: `target` depends on `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub source: String,
    pub target: String,
}

impl WorkflowEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A workflow graph as supplied by the editor layer.
///
/// The edge relation must form a DAG; `flowlens-engine` validates this when
/// building its dependency view and rejects cyclic input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: WorkflowNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(WorkflowEdge::new(source, target));
        self
    }

    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_kind_roundtrips_through_lowercase_tags() {
        let kind: NodeKind = serde_json::from_value(json!("action")).unwrap();
        assert_eq!(kind, NodeKind::Action);

        let custom: NodeKind = serde_json::from_value(json!("webhook")).unwrap();
        assert_eq!(custom, NodeKind::Other("webhook".to_string()));
    }

    #[test]
    fn data_bag_accessors_read_numeric_hints() {
        let node = WorkflowNode::new("n1", NodeKind::Action)
            .with_data("complexity", json!(2.5))
            .with_data("cpu", json!(3000))
            .with_data("label", json!("not a number"));

        assert_eq!(node.complexity(), Some(2.5));
        assert_eq!(node.cpu_hint(), Some(3000.0));
        assert_eq!(node.memory_hint(), None);
    }
}
