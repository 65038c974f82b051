//! Whole-resume rewriting and change highlighting

use crate::error::{Result, ResumeRefinerError};
use crate::llm::client::Completer;
use crate::llm::parsing::clean_llm_output;
use crate::llm::prompts;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Lines at least this similar to some original line are treated as unchanged
pub const UNCHANGED_SIMILARITY: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightedLine {
    pub text: String,
    pub is_new: bool,
}

pub struct ResumeRewriter<'a, C> {
    completer: &'a C,
}

impl<'a, C: Completer> ResumeRewriter<'a, C> {
    pub fn new(completer: &'a C) -> Self {
        Self { completer }
    }

    /// Ask the completion service for an improved resume with the same layout
    pub async fn rewrite(&self, resume_text: &str, job_description: &str) -> Result<String> {
        if resume_text.trim().is_empty() {
            return Err(ResumeRefinerError::MissingInput(
                "Resume text is empty".to_string(),
            ));
        }

        let start_time = Instant::now();
        let prompt = prompts::render_rewrite(resume_text, job_description);
        let raw = self.completer.complete(&prompt).await?;
        let rewritten = clean_llm_output(&raw);

        if rewritten.is_empty() {
            return Err(ResumeRefinerError::Completion(
                "Rewrite came back empty".to_string(),
            ));
        }

        info!(
            "Resume rewritten by {} in {:.2?}",
            self.completer.model_name(),
            start_time.elapsed()
        );
        Ok(rewritten)
    }
}

/// Mark rewritten lines that have no close counterpart in the original
pub fn highlight_changes(original: &str, rewritten: &str) -> Vec<HighlightedLine> {
    let original_lines: Vec<&str> = original
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    rewritten
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            let is_new = !trimmed.is_empty()
                && !original_lines.iter().any(|candidate| {
                    strsim::normalized_levenshtein(trimmed, candidate) >= UNCHANGED_SIMILARITY
                });
            HighlightedLine {
                text: line.to_string(),
                is_new,
            }
        })
        .collect()
}
