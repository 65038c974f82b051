//! Error handling for the resume refiner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeRefinerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Completion service error: {0}")]
    Completion(String),

    #[error("Schema parse failure: {0}")]
    SchemaParse(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("PDF rendering error: {0}")]
    PdfRendering(String),
}

pub type Result<T> = std::result::Result<T, ResumeRefinerError>;

/// Convert anyhow errors (surfaced by model2vec) to our custom error type
impl From<anyhow::Error> for ResumeRefinerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeRefinerError::ModelError(err.to_string())
    }
}

impl From<reqwest::Error> for ResumeRefinerError {
    fn from(err: reqwest::Error) -> Self {
        ResumeRefinerError::Completion(err.to_string())
    }
}
