//! Optimization report assembled from a pipeline outcome and the scoring engine

use crate::error::Result;
use crate::llm::prompts::OptimizationObjective;
use crate::llm::schema::{OptimizationSuggestions, ResumeAttributes};
use crate::pipeline::state::{PipelineIssue, Termination, WorkflowOutcome};
use crate::processing::ats_scorer::{AtsScorer, ScoreBreakdown};
use crate::processing::embeddings::Embedder;
use crate::processing::keywords::{extract_keywords, KeywordRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many missing keywords the renderers show
pub const MISSING_KEYWORDS_SHOWN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        if score > 70 {
            ScoreBand::Strong
        } else if score > 40 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG MATCH",
            ScoreBand::Moderate => "PARTIAL MATCH",
            ScoreBand::Weak => "WEAK MATCH",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume_source: String,
    pub embedding_model: String,
    pub language_model: String,
    pub tool_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub metadata: ReportMetadata,
    pub job_title: String,
    pub objective: OptimizationObjective,
    pub score: u8,
    pub band: ScoreBand,
    pub breakdown: ScoreBreakdown,
    pub keywords: Vec<KeywordRow>,
    pub missing_keywords: Vec<String>,
    pub resume_attributes: ResumeAttributes,
    pub suggestions: OptimizationSuggestions,
    pub termination: Termination,
    pub passes: usize,
    pub issues: Vec<PipelineIssue>,
    /// Attributes came back empty, so the score reflects a failed extraction
    pub degraded: bool,
}

/// Inputs that describe the run but are not part of the pipeline outcome
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub resume_source: &'a str,
    pub job_title: &'a str,
    pub job_description: &'a str,
    pub objective: OptimizationObjective,
    pub language_model: &'a str,
}

impl OptimizationReport {
    pub fn build<E: Embedder>(
        embedder: &E,
        context: &ReportContext<'_>,
        outcome: WorkflowOutcome,
    ) -> Result<Self> {
        let scorer = AtsScorer::new(embedder);
        let breakdown = scorer.breakdown(&outcome.resume_attributes, context.job_description)?;
        let score = breakdown.total();
        let keywords = extract_keywords(&outcome.resume_attributes, context.job_description);
        let degraded = outcome.is_degraded();

        Ok(Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                resume_source: context.resume_source.to_string(),
                embedding_model: embedder.model_name().to_string(),
                language_model: context.language_model.to_string(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            job_title: context.job_title.to_string(),
            objective: context.objective,
            score,
            band: ScoreBand::for_score(score),
            breakdown,
            keywords: keywords.rows,
            missing_keywords: keywords.missing,
            resume_attributes: outcome.resume_attributes,
            suggestions: outcome.optimization_suggestions,
            termination: outcome.termination,
            passes: outcome.passes,
            issues: outcome.issues,
            degraded,
        })
    }

    pub fn shown_missing_keywords(&self) -> &[String] {
        let end = self.missing_keywords.len().min(MISSING_KEYWORDS_SHOWN);
        &self.missing_keywords[..end]
    }
}
