//! Drives the extraction → suggestion → gate state machine

use crate::config::Config;
use crate::error::{Result, ResumeRefinerError};
use crate::llm::client::Completer;
use crate::llm::schema::ResumeAttributes;
use crate::pipeline::nodes::{reanalysis_gate, ExtractionNode, SuggestionNode};
use crate::pipeline::state::{
    ExtractionInput, GateInput, OptimizationRequest, PipelineIssue, Stage, SuggestionInput,
    Termination, WorkflowOutcome, WorkflowState,
};
use crate::processing::embeddings::Embedder;
use crate::processing::index::SimilarityIndex;
use log::{error, info, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub retrieval_k: usize,
    pub max_passes: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            retrieval_k: 5,
            max_passes: 3,
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retrieval_k: config.retrieval.k,
            max_passes: config.pipeline.max_passes,
        }
    }
}

pub struct Orchestrator<E, C> {
    embedder: E,
    completer: C,
    settings: PipelineSettings,
}

impl<E: Embedder, C: Completer> Orchestrator<E, C> {
    pub fn new(embedder: E, completer: C, settings: PipelineSettings) -> Self {
        Self {
            embedder,
            completer,
            settings,
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn completer(&self) -> &C {
        &self.completer
    }

    /// Run one request to a terminal state.
    ///
    /// Node failures are recorded as issues on the outcome; only invalid
    /// settings make this return an error.
    pub async fn run(&self, request: OptimizationRequest) -> Result<WorkflowOutcome> {
        if self.settings.max_passes == 0 || self.settings.retrieval_k == 0 {
            return Err(ResumeRefinerError::InvalidInput(
                "max_passes and retrieval k must both be at least 1".to_string(),
            ));
        }

        let start_time = Instant::now();
        let mut state = WorkflowState::from(request);
        self.index_documents(&mut state);

        let extraction = ExtractionNode::new(&self.embedder, &self.completer, self.settings.retrieval_k);
        let suggestion = SuggestionNode::new(&self.completer);
        let mut termination = Termination::Completed;
        let mut stage = Stage::Extracting;

        loop {
            state.trace.push(stage);
            stage = match stage {
                Stage::Extracting => {
                    state.passes += 1;
                    let output = extraction
                        .run(ExtractionInput {
                            index: state.index.as_ref(),
                            job_title: &state.job_title,
                            job_description: &state.job_description,
                        })
                        .await;
                    state.resume_attributes = Some(output.resume_attributes);
                    state.record_issue(output.issue);
                    Stage::Suggesting
                }
                Stage::Suggesting => {
                    let fallback = ResumeAttributes::default();
                    let output = suggestion
                        .run(SuggestionInput {
                            resume_attributes: state.resume_attributes.as_ref().unwrap_or(&fallback),
                            job_title: &state.job_title,
                            job_description: &state.job_description,
                            objective: state.objective,
                        })
                        .await;
                    state.optimization_suggestions = Some(output.optimization_suggestions);
                    state.record_issue(output.issue);
                    Stage::Gating
                }
                Stage::Gating => {
                    let output = reanalysis_gate(GateInput {
                        trigger_reanalyze: state.trigger_reanalyze,
                    });
                    state.reanalyze = output.reanalyze;
                    if !output.reanalyze {
                        Stage::Done
                    } else if state.passes >= self.settings.max_passes {
                        warn!(
                            "Reanalysis requested but pass limit {} reached, stopping",
                            self.settings.max_passes
                        );
                        termination = Termination::ReanalysisLimitReached;
                        Stage::Done
                    } else {
                        Stage::Extracting
                    }
                }
                Stage::Indexing | Stage::Done => break,
            };
        }

        info!(
            "Pipeline finished in {:.2?} after {} pass(es) with {} issue(s)",
            start_time.elapsed(),
            state.passes,
            state.issues.len()
        );

        Ok(WorkflowOutcome {
            resume_attributes: state.resume_attributes.unwrap_or_default(),
            optimization_suggestions: state.optimization_suggestions.unwrap_or_default(),
            termination,
            passes: state.passes,
            trace: state.trace,
            issues: state.issues,
        })
    }

    fn index_documents(&self, state: &mut WorkflowState) {
        state.trace.push(Stage::Indexing);
        match SimilarityIndex::build(&self.embedder, &state.documents) {
            Ok(index) => {
                info!("Indexed {} resume chunk(s)", index.len());
                state.index = Some(index);
            }
            Err(e) => {
                error!("Error embedding documents: {}", e);
                state.issues.push(PipelineIssue::from_error(Stage::Indexing, &e));
            }
        }
    }
}
