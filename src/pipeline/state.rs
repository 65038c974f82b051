//! Workflow state, node contracts and run outcomes

use crate::error::ResumeRefinerError;
use crate::input::DocumentChunk;
use crate::llm::prompts::OptimizationObjective;
use crate::llm::schema::{OptimizationSuggestions, ResumeAttributes};
use crate::processing::index::SimilarityIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Indexing,
    Extracting,
    Suggesting,
    Gating,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Indexing => "indexing",
            Stage::Extracting => "extracting",
            Stage::Suggesting => "suggesting",
            Stage::Gating => "gating",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    MissingInput,
    SchemaParseFailure,
    ServiceFailure,
}

impl IssueKind {
    pub fn classify(err: &ResumeRefinerError) -> Self {
        match err {
            ResumeRefinerError::MissingInput(_) => IssueKind::MissingInput,
            ResumeRefinerError::SchemaParse(_) | ResumeRefinerError::Serialization(_) => {
                IssueKind::SchemaParseFailure
            }
            _ => IssueKind::ServiceFailure,
        }
    }
}

/// A recoverable failure recorded while the pipeline kept going
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineIssue {
    pub stage: Stage,
    pub kind: IssueKind,
    pub message: String,
}

impl PipelineIssue {
    pub fn from_error(stage: Stage, err: &ResumeRefinerError) -> Self {
        Self {
            stage,
            kind: IssueKind::classify(err),
            message: err.to_string(),
        }
    }
}

/// Everything a caller supplies for one optimization run
#[derive(Debug, Clone)]
pub struct OptimizationRequest {
    pub documents: Vec<DocumentChunk>,
    pub job_title: String,
    pub job_description: String,
    pub objective: OptimizationObjective,
    pub trigger_reanalyze: bool,
}

impl OptimizationRequest {
    pub fn new(
        documents: Vec<DocumentChunk>,
        job_title: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            job_title: job_title.into(),
            job_description: job_description.into(),
            objective: OptimizationObjective::default(),
            trigger_reanalyze: false,
        }
    }

    pub fn with_objective(mut self, objective: OptimizationObjective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_reanalysis(mut self, trigger_reanalyze: bool) -> Self {
        self.trigger_reanalyze = trigger_reanalyze;
        self
    }
}

/// Mutable record threaded through the pipeline stages
#[derive(Debug)]
pub struct WorkflowState {
    pub documents: Vec<DocumentChunk>,
    pub job_title: String,
    pub job_description: String,
    pub objective: OptimizationObjective,
    pub trigger_reanalyze: bool,
    pub index: Option<SimilarityIndex>,
    pub resume_attributes: Option<ResumeAttributes>,
    pub optimization_suggestions: Option<OptimizationSuggestions>,
    pub reanalyze: bool,
    pub passes: usize,
    pub trace: Vec<Stage>,
    pub issues: Vec<PipelineIssue>,
}

impl From<OptimizationRequest> for WorkflowState {
    fn from(request: OptimizationRequest) -> Self {
        Self {
            documents: request.documents,
            job_title: request.job_title,
            job_description: request.job_description,
            objective: request.objective,
            trigger_reanalyze: request.trigger_reanalyze,
            index: None,
            resume_attributes: None,
            optimization_suggestions: None,
            reanalyze: false,
            passes: 0,
            trace: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl WorkflowState {
    pub fn record_issue(&mut self, issue: Option<PipelineIssue>) {
        if let Some(issue) = issue {
            self.issues.push(issue);
        }
    }
}

pub struct ExtractionInput<'a> {
    pub index: Option<&'a SimilarityIndex>,
    pub job_title: &'a str,
    pub job_description: &'a str,
}

#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    pub resume_attributes: ResumeAttributes,
    pub issue: Option<PipelineIssue>,
}

pub struct SuggestionInput<'a> {
    pub resume_attributes: &'a ResumeAttributes,
    pub job_title: &'a str,
    pub job_description: &'a str,
    pub objective: OptimizationObjective,
}

#[derive(Debug, Clone)]
pub struct SuggestionOutput {
    pub optimization_suggestions: OptimizationSuggestions,
    pub issue: Option<PipelineIssue>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GateInput {
    pub trigger_reanalyze: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutput {
    pub reanalyze: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The gate declined another pass
    Completed,
    /// The gate kept asking for reanalysis until the pass limit was hit
    ReanalysisLimitReached,
}

/// Final result of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub resume_attributes: ResumeAttributes,
    pub optimization_suggestions: OptimizationSuggestions,
    pub termination: Termination,
    pub passes: usize,
    pub trace: Vec<Stage>,
    pub issues: Vec<PipelineIssue>,
}

impl WorkflowOutcome {
    /// True when no usable attributes came back, so any score is not meaningful
    pub fn is_degraded(&self) -> bool {
        self.resume_attributes.is_empty()
    }
}
