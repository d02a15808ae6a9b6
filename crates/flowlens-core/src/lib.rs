//! Shared data model for the FlowLens workflow analysis engine.
//!
//! This crate holds the value types every other part of the engine operates
//! on: the workflow graph itself, the fixed runtime metric tuple, the engine
//! configuration, and the error taxonomy. It contains no behavior beyond
//! accessors - all analysis lives in `flowlens-engine`.

pub mod config;
pub mod error;
pub mod metrics;
pub mod workflow;

pub use config::EngineConfig;
pub use error::EngineError;
pub use metrics::{MetricKind, MetricSample};
pub use workflow::{NodeKind, Workflow, WorkflowEdge, WorkflowNode};
