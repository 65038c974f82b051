//! CLI interface for the resume refiner

use crate::config::OutputFormat;
use crate::llm::prompts::OptimizationObjective;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-refiner")]
#[command(version)]
#[command(about = "Score a resume against a job description and generate targeted improvements")]
#[command(
    long_about = "Extract structured attributes from a resume with a language model, score ATS compatibility \
                  from embeddings, keyword overlap and skill matches, and produce optimization suggestions or a rewritten resume"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume and generate optimization suggestions
    Optimize {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Target job title
        #[arg(short = 't', long)]
        title: String,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Optimization focus for the suggestions
        #[arg(long, value_enum, default_value_t = OptimizationObjective::AtsKeywordOptimizer)]
        objective: OptimizationObjective,

        /// Ask for another extraction pass after suggestions (bounded by pipeline.max_passes)
        #[arg(long)]
        reanalyze: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show extracted attributes and keyword coverage
        #[arg(short, long)]
        detailed: bool,
    },

    /// Rewrite the resume for a job description, keeping its layout
    Rewrite {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Write the rewritten resume to this PDF
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Mark lines that are new compared to the original
        #[arg(long)]
        highlight: bool,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known and downloaded embedding models
    List,

    /// Download an embedding model from the Hugging Face Hub
    Download {
        /// Repository ID, e.g. minishlab/potion-base-8M (defaults to the configured model)
        model: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if allowed_extensions.contains(&ext.to_lowercase().as_str()) => Ok(()),
        Some(ext) => Err(format!(
            "Unsupported file extension: .{}. Allowed: {}",
            ext,
            allowed_extensions.join(", ")
        )),
        None => Err("File has no extension".to_string()),
    }
}

/// Reject a blank value for a required text field
pub fn require_text(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field))
    } else {
        Ok(())
    }
}

/// Reject a resume path that does not exist
pub fn require_file(path: &Path, field: &str) -> Result<(), String> {
    if path.is_file() {
        Ok(())
    } else {
        Err(format!("{} not found: {}", field, path.display()))
    }
}
