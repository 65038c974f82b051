//! The three pipeline nodes. Extraction and suggestion never fail; errors
//! degrade to empty records plus a reported issue.

use crate::error::{Result, ResumeRefinerError};
use crate::llm::client::Completer;
use crate::llm::parsing::parse_structured;
use crate::llm::prompts::{self, SuggestionParams};
use crate::llm::schema::{OptimizationSuggestions, ResumeAttributes};
use crate::pipeline::state::{
    ExtractionInput, ExtractionOutput, GateInput, GateOutput, PipelineIssue, Stage,
    SuggestionInput, SuggestionOutput,
};
use crate::processing::embeddings::Embedder;
use log::{debug, error, info};

/// Query used for retrieval: job description, else job title, else "resume"
pub fn retrieval_query<'a>(job_description: &'a str, job_title: &'a str) -> &'a str {
    if !job_description.trim().is_empty() {
        job_description
    } else if !job_title.trim().is_empty() {
        job_title
    } else {
        "resume"
    }
}

pub struct ExtractionNode<'a, E, C> {
    embedder: &'a E,
    completer: &'a C,
    k: usize,
}

impl<'a, E: Embedder, C: Completer> ExtractionNode<'a, E, C> {
    pub fn new(embedder: &'a E, completer: &'a C, k: usize) -> Self {
        Self {
            embedder,
            completer,
            k,
        }
    }

    pub async fn run(&self, input: ExtractionInput<'_>) -> ExtractionOutput {
        info!("Extracting resume attributes");
        match self.extract(&input).await {
            Ok(resume_attributes) => ExtractionOutput {
                resume_attributes,
                issue: None,
            },
            Err(e) => {
                error!("Error in resume extraction: {}", e);
                ExtractionOutput {
                    resume_attributes: ResumeAttributes::default(),
                    issue: Some(PipelineIssue::from_error(Stage::Extracting, &e)),
                }
            }
        }
    }

    async fn extract(&self, input: &ExtractionInput<'_>) -> Result<ResumeAttributes> {
        let index = input.index.ok_or_else(|| {
            ResumeRefinerError::MissingInput("Similarity index not found in state".to_string())
        })?;

        let query = retrieval_query(input.job_description, input.job_title);
        debug!(
            "Retrieval query: {}",
            query.chars().take(80).collect::<String>()
        );

        let context = index
            .query(self.embedder, query, self.k)?
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = prompts::render_extraction(&context);
        let raw = self.completer.complete(&prompt).await?;
        parse_structured(&raw)
    }
}

pub struct SuggestionNode<'a, C> {
    completer: &'a C,
}

impl<'a, C: Completer> SuggestionNode<'a, C> {
    pub fn new(completer: &'a C) -> Self {
        Self { completer }
    }

    pub async fn run(&self, input: SuggestionInput<'_>) -> SuggestionOutput {
        info!("Generating optimization suggestions ({})", input.objective);
        let prompt = prompts::render_suggestions(&SuggestionParams {
            resume_attributes: input.resume_attributes,
            job_title: input.job_title,
            job_description: input.job_description,
            objective: input.objective,
        });

        let parsed = match self.completer.complete(&prompt).await {
            Ok(raw) => parse_structured::<OptimizationSuggestions>(&raw),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(optimization_suggestions) => SuggestionOutput {
                optimization_suggestions,
                issue: None,
            },
            Err(e) => {
                error!("Error generating suggestions: {}", e);
                SuggestionOutput {
                    optimization_suggestions: OptimizationSuggestions::default(),
                    issue: Some(PipelineIssue::from_error(Stage::Suggesting, &e)),
                }
            }
        }
    }
}

/// Copies the trigger through unchanged
pub fn reanalysis_gate(input: GateInput) -> GateOutput {
    info!("Checking reanalysis flag: {}", input.trigger_reanalyze);
    GateOutput {
        reanalyze: input.trigger_reanalyze,
    }
}
