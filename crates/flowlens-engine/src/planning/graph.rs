use flowlens_core::{EngineError, Workflow};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use std::collections::{HashMap, HashSet};

/// Adjacency view of a workflow graph.
///
/// Edges are inverted on construction: for every node the graph records the
/// nodes it depends on (`dependencies`) and the nodes that depend on it
/// (`dependents`). Construction fails fast on edges that reference
/// undeclared nodes and on cyclic input, so the planning algorithms can
/// assume a valid DAG throughout.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    node_ids: Vec<String>,
    dependencies: HashMap<String, Vec<String>>,
    dependents: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn build(workflow: &Workflow) -> Result<Self, EngineError> {
        if workflow.nodes.is_empty() {
            return Err(EngineError::EmptyWorkflow(workflow.id.clone()));
        }

        let node_ids: Vec<String> = workflow.nodes.iter().map(|n| n.id.clone()).collect();
        let mut dependencies: HashMap<String, Vec<String>> =
            node_ids.iter().map(|id| (id.clone(), Vec::new())).collect();
        let mut dependents: HashMap<String, Vec<String>> =
            node_ids.iter().map(|id| (id.clone(), Vec::new())).collect();

        let mut dag: DiGraph<&str, ()> = DiGraph::new();
        let mut indices = HashMap::new();
        for id in &node_ids {
            indices.insert(id.as_str(), dag.add_node(id.as_str()));
        }

        for edge in &workflow.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !indices.contains_key(endpoint.as_str()) {
                    return Err(EngineError::UnknownNode {
                        workflow_id: workflow.id.clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
            dependencies
                .get_mut(&edge.target)
                .expect("target verified above")
                .push(edge.source.clone());
            dependents
                .get_mut(&edge.source)
                .expect("source verified above")
                .push(edge.target.clone());
            dag.add_edge(indices[edge.source.as_str()], indices[edge.target.as_str()], ());
        }

        if is_cyclic_directed(&dag) {
            return Err(EngineError::CyclicWorkflow {
                workflow_id: workflow.id.clone(),
            });
        }

        Ok(Self {
            node_ids,
            dependencies,
            dependents,
        })
    }

    /// Node ids in declaration order.
    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    pub fn dependencies_of(&self, id: &str) -> &[String] {
        self.dependencies.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dependents_of(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The full node -> dependency-ids map.
    pub fn dependency_map(&self) -> &HashMap<String, Vec<String>> {
        &self.dependencies
    }

    /// Nodes with no dependencies.
    pub fn roots(&self) -> Vec<&str> {
        self.node_ids
            .iter()
            .filter(|id| self.dependencies_of(id).is_empty())
            .map(String::as_str)
            .collect()
    }

    /// True when `node` depends on `other`, directly or transitively.
    pub fn depends_on(&self, node: &str, other: &str) -> bool {
        let mut stack: Vec<&str> = self.dependencies_of(node).iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == other {
                return true;
            }
            if seen.insert(current) {
                stack.extend(self.dependencies_of(current).iter().map(String::as_str));
            }
        }
        false
    }

    /// True when either node reaches the other through the dependency
    /// relation; such a pair must never share a parallel group.
    pub fn related(&self, a: &str, b: &str) -> bool {
        self.depends_on(a, b) || self.depends_on(b, a)
    }

    /// Topological order via depth-first postorder over the dependency
    /// relation: every node appears after all of its dependencies and
    /// therefore before all of its dependents. Deterministic for a given
    /// node declaration order.
    pub fn topological_order(&self) -> Vec<String> {
        let mut order = Vec::with_capacity(self.node_ids.len());
        let mut visited = HashSet::new();
        for id in &self.node_ids {
            self.visit_postorder(id, &mut visited, &mut order);
        }
        order
    }

    fn visit_postorder<'a>(
        &'a self,
        id: &'a str,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<String>,
    ) {
        if !visited.insert(id) {
            return;
        }
        for dep in self.dependencies_of(id) {
            self.visit_postorder(dep, visited, order);
        }
        order.push(id.to_string());
    }
}
