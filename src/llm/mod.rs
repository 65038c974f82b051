//! Completion service integration: prompts, structured parsing and rewriting

pub mod client;
pub mod parsing;
pub mod prompts;
pub mod rewriter;
pub mod schema;

pub use client::{ChatCompletionClient, Completer};
pub use prompts::OptimizationObjective;
pub use rewriter::{highlight_changes, HighlightedLine, ResumeRewriter};
pub use schema::{OptimizationSuggestions, ResumeAttributes};
