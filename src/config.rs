//! Configuration management for the resume refiner

use crate::error::{Result, ResumeRefinerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub embedding_model: String,
    pub llm_model: String,
}

/// Settings for the OpenAI-compatible completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on extraction passes per request (reanalysis included)
    pub max_passes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-refiner")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "minishlab/potion-base-8M".to_string(),
                llm_model: "gpt-4o-mini".to_string(),
            },
            llm: LlmConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                temperature: 0.0,
                max_tokens: None,
                timeout_secs: 60,
                max_retries: 3,
                initial_backoff_ms: 200,
                max_backoff_ms: 5_000,
            },
            retrieval: RetrievalConfig {
                k: 5,
                chunk_size: 1000,
                chunk_overlap: 100,
            },
            pipeline: PipelineConfig { max_passes: 3 },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ResumeRefinerError::Configuration(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeRefinerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-refiner")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &Path {
        &self.models.models_dir
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.k == 0 {
            return Err(ResumeRefinerError::Configuration(
                "retrieval.k must be at least 1".to_string(),
            ));
        }
        if self.retrieval.chunk_size <= self.retrieval.chunk_overlap {
            return Err(ResumeRefinerError::Configuration(
                "retrieval.chunk_size must be greater than retrieval.chunk_overlap".to_string(),
            ));
        }
        if self.pipeline.max_passes == 0 {
            return Err(ResumeRefinerError::Configuration(
                "pipeline.max_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
