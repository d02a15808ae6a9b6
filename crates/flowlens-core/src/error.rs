use thiserror::Error;

/// Error taxonomy for workflow analysis.
///
/// Insufficient history is deliberately *not* an error anywhere in the
/// engine; it degrades into default baselines and low-confidence results
/// instead. These variants cover genuinely malformed input and failures at
/// the metrics-source boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The edge relation contains a cycle, so no execution order exists.
    #[error("workflow '{workflow_id}' contains a dependency cycle")]
    CyclicWorkflow { workflow_id: String },

    /// An edge references a node id that is not declared in the workflow.
    #[error("workflow '{workflow_id}' references unknown node '{node_id}'")]
    UnknownNode {
        workflow_id: String,
        node_id: String,
    },

    /// A workflow with no nodes cannot be planned.
    #[error("workflow '{0}' has no nodes")]
    EmptyWorkflow(String),

    /// The external metrics source failed to produce a reading.
    #[error("metrics source failure: {0}")]
    MetricsSource(String),
}
