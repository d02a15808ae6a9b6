//! End-to-end planning tests driving the optimizer facade the way a
//! workflow editor backend would.

use flowlens_core::{EngineError, MetricSample, NodeKind, Workflow, WorkflowNode};
use flowlens_engine::planning::ExecutionStrategy;
use flowlens_engine::WorkflowOptimizer;
use serde_json::json;

fn chain(ids: &[&str]) -> Workflow {
    let mut wf = Workflow::new("chain");
    for id in ids {
        wf = wf.with_node(WorkflowNode::new(*id, NodeKind::Action));
    }
    for pair in ids.windows(2) {
        wf = wf.with_edge(pair[0], pair[1]);
    }
    wf
}

#[test]
fn linear_chain_plans_sequentially() {
    let wf = chain(&["a", "b", "c"]);
    let optimizer = WorkflowOptimizer::default();

    let plan = optimizer.generate_execution_plan(&wf, 10).unwrap();

    assert_eq!(plan.optimal_order, ["a", "b", "c"]);
    assert_eq!(plan.critical_path, ["a", "b", "c"]);
    assert_eq!(plan.estimated_time_ms, 6000.0);
    // Every pair in a chain is dependency-related, so no group can hold
    // more than one node.
    assert_eq!(plan.parallel_groups.len(), 3);
    assert!(plan.parallel_groups.iter().all(|g| g.len() == 1));
    // Full history, three nodes.
    assert!((plan.confidence - 1.0 / 1.03).abs() < 1e-9);
}

#[test]
fn diamond_groups_independent_branches() {
    let wf = Workflow::new("diamond")
        .with_node(WorkflowNode::new("a", NodeKind::Action))
        .with_node(WorkflowNode::new("b", NodeKind::Action))
        .with_node(WorkflowNode::new("join", NodeKind::Action))
        .with_edge("a", "join")
        .with_edge("b", "join");
    let optimizer = WorkflowOptimizer::default();

    let plan = optimizer.plan_parallel_execution(&wf).unwrap();

    assert_eq!(plan.groups.len(), 2);
    assert_eq!(plan.groups[0].members, ["a", "b"]);
    assert_eq!(plan.groups[1].members, ["join"]);
    assert_eq!(plan.groups[0].max_concurrency, 2);
    assert_eq!(plan.strategy, ExecutionStrategy::Optimal);
    assert_eq!(
        plan.dependency_map["join"],
        vec!["a".to_string(), "b".to_string()]
    );
    assert!(plan.dependency_map["a"].is_empty());
}

#[test]
fn group_time_is_the_heaviest_member() {
    let wf = Workflow::new("wf")
        .with_node(WorkflowNode::new("fast", NodeKind::Condition))
        .with_node(WorkflowNode::new("slow", NodeKind::Loop));
    let optimizer = WorkflowOptimizer::default();

    let plan = optimizer.plan_parallel_execution(&wf).unwrap();
    assert_eq!(plan.groups.len(), 1);
    assert_eq!(plan.groups[0].estimated_time_ms, 5000.0);
}

#[test]
fn strictly_sequential_graph_selects_depth_first() {
    let wf = chain(&["a", "b", "c", "d"]);
    let optimizer = WorkflowOptimizer::default();

    let plan = optimizer.plan_parallel_execution(&wf).unwrap();
    assert_eq!(plan.strategy, ExecutionStrategy::DepthFirst);
}

#[test]
fn cyclic_workflow_is_rejected_by_every_pass() {
    let wf = Workflow::new("cycle")
        .with_node(WorkflowNode::new("a", NodeKind::Action))
        .with_node(WorkflowNode::new("b", NodeKind::Action))
        .with_edge("a", "b")
        .with_edge("b", "a");
    let optimizer = WorkflowOptimizer::default();

    assert!(matches!(
        optimizer.generate_execution_plan(&wf, 0),
        Err(EngineError::CyclicWorkflow { .. })
    ));
    assert!(matches!(
        optimizer.plan_parallel_execution(&wf),
        Err(EngineError::CyclicWorkflow { .. })
    ));
    assert!(matches!(
        optimizer.predict_bottlenecks(&wf, &[]),
        Err(EngineError::CyclicWorkflow { .. })
    ));
}

#[test]
fn empty_workflow_is_rejected_by_every_pass() {
    let wf = Workflow::new("empty");
    let optimizer = WorkflowOptimizer::default();

    assert!(matches!(
        optimizer.generate_execution_plan(&wf, 0),
        Err(EngineError::EmptyWorkflow(_))
    ));
    assert!(matches!(
        optimizer.optimize_resources(&wf),
        Err(EngineError::EmptyWorkflow(_))
    ));
}

#[test]
fn resource_plan_discounts_and_aggregates() {
    let wf = Workflow::new("wf")
        .with_node(WorkflowNode::new("a", NodeKind::Action))
        .with_node(WorkflowNode::new("b", NodeKind::Action).with_data("cpu", json!(2000)));
    let optimizer = WorkflowOptimizer::default();

    let plan = optimizer.optimize_resources(&wf).unwrap();

    assert_eq!(plan.allocations.len(), 2);
    assert_eq!(plan.allocations[0].cpu, 900.0);
    assert_eq!(plan.allocations[1].cpu, 1800.0);
    assert_eq!(plan.scaling.initial.cpu, 2700.0);
    assert_eq!(plan.scaling.max.cpu, 8100.0);
    assert!(plan.efficiency < 1.0);
    assert!(plan.estimated_cost > 0.0);
}

#[test]
fn bottleneck_prediction_combines_graph_and_history() {
    let mut wf = Workflow::new("wf");
    for i in 0..7 {
        wf = wf.with_node(WorkflowNode::new(format!("n{i}"), NodeKind::Action));
    }
    for i in 0..6 {
        wf = wf.with_edge(format!("n{i}"), format!("n{}", i + 1));
    }
    wf.nodes[0].data.insert("cpu".to_string(), json!(3000));

    let slow = MetricSample {
        execution_time_ms: 8000.0,
        ..MetricSample::default()
    };
    let optimizer = WorkflowOptimizer::default();
    let analysis = optimizer.predict_bottlenecks(&wf, &[slow, slow, slow]).unwrap();

    // One resource finding, one chain finding, one history finding.
    assert_eq!(analysis.bottlenecks.len(), 3);
    assert!(analysis
        .bottlenecks
        .iter()
        .any(|b| b.node_id.as_deref() == Some("n0")));
    assert!(analysis.bottlenecks.iter().any(|b| b.node_id.is_none()));
    assert!(analysis.risk_score > 0.0 && analysis.risk_score <= 1.0);
    assert!(!analysis.recommendations.is_empty());
}
