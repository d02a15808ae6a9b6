use chrono::{DateTime, Utc};
use flowlens_core::MetricSample;
use serde::{Deserialize, Serialize};

/// Version and environment tag attached to every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub version: String,
    pub environment: String,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// One timestamped metrics sample for a workflow or a specific node.
/// Immutable once created; the tracker appends it to a bounded per-key
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub timestamp: DateTime<Utc>,
    pub workflow_id: String,
    pub node_id: Option<String>,
    pub metrics: MetricSample,
    pub metadata: SnapshotMetadata,
}

impl PerformanceSnapshot {
    /// History key: `workflowId` for workflow-level samples,
    /// `workflowId:nodeId` for node-level ones.
    pub fn history_key(workflow_id: &str, node_id: Option<&str>) -> String {
        match node_id {
            Some(node) => format!("{workflow_id}:{node}"),
            None => workflow_id.to_string(),
        }
    }

    pub fn key(&self) -> String {
        Self::history_key(&self.workflow_id, self.node_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_key_includes_node_when_present() {
        assert_eq!(PerformanceSnapshot::history_key("wf1", None), "wf1");
        assert_eq!(
            PerformanceSnapshot::history_key("wf1", Some("step-2")),
            "wf1:step-2"
        );
    }
}
