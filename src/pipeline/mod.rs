//! Cyclic optimization workflow: retrieval-backed extraction, suggestions and reanalysis

pub mod nodes;
pub mod orchestrator;
pub mod state;

pub use orchestrator::{Orchestrator, PipelineSettings};
pub use state::{
    IssueKind, OptimizationRequest, PipelineIssue, Stage, Termination, WorkflowOutcome,
};
