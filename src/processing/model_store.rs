//! Local store for Model2Vec embedding models fetched from the Hugging Face Hub

use crate::error::{Result, ResumeRefinerError};
use hf_hub::api::tokio::Api;
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A model the store knows how to fetch
#[derive(Debug, Clone, Serialize)]
pub struct KnownModel {
    pub repo_id: &'static str,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: &'static str,
}

pub const KNOWN_MODELS: &[KnownModel] = &[
    KnownModel {
        repo_id: "minishlab/potion-base-8M",
        size_mb: 33,
        dimensions: 256,
        description: "Default static embeddings, good quality/size balance",
    },
    KnownModel {
        repo_id: "minishlab/potion-base-32M",
        size_mb: 130,
        dimensions: 512,
        description: "Larger potion model for higher accuracy",
    },
    KnownModel {
        repo_id: "minishlab/M2V_base_output",
        size_mb: 90,
        dimensions: 256,
        description: "Legacy Model2Vec base embeddings",
    },
];

/// Everything `StaticModel::from_pretrained` reads from a local folder
const REQUIRED_FILES: &[&str] = &["tokenizer.json", "model.safetensors", "config.json"];

/// Summary of a model in the store, downloaded or not
#[derive(Debug, Clone, Serialize)]
pub struct StoredModel {
    pub repo_id: String,
    pub downloaded: bool,
    pub known: Option<KnownModel>,
}

pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Directory a repo id is stored under (`org/name` becomes `org--name`)
    pub fn local_dir(&self, repo_id: &str) -> PathBuf {
        self.models_dir.join(repo_id.replace('/', "--"))
    }

    pub async fn is_downloaded(&self, repo_id: &str) -> bool {
        has_required_files(&self.local_dir(repo_id)).await
    }

    /// Resolve a model to a local directory, downloading on a cache miss.
    ///
    /// An existing directory path is accepted as-is, so a model can be
    /// pointed at directly from the config.
    pub async fn ensure_available(&self, model: &str) -> Result<PathBuf> {
        let as_path = Path::new(model);
        if as_path.is_dir() && has_required_files(as_path).await {
            debug!("Using local model directory {}", as_path.display());
            return Ok(as_path.to_path_buf());
        }

        let local_dir = self.local_dir(model);
        if has_required_files(&local_dir).await {
            debug!("Embedding model {} found in store", model);
            return Ok(local_dir);
        }

        self.download(model).await
    }

    pub async fn download(&self, repo_id: &str) -> Result<PathBuf> {
        let model_dir = self.local_dir(repo_id);
        fs::create_dir_all(&model_dir).await.map_err(|e| {
            ResumeRefinerError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        info!("Downloading embedding model {}", repo_id);
        println!("📥 Downloading embedding model: {}", repo_id);

        let api = Api::new().map_err(|e| {
            ResumeRefinerError::ModelError(format!("Failed to initialize HF API: {}", e))
        })?;
        let repo = api.repo(hf_hub::Repo::model(repo_id.to_string()));

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ResumeRefinerError::ModelError(format!(
                    "Failed to download required file {}: {}",
                    file, e
                ))
            })?;
            fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                ResumeRefinerError::ModelError(format!("Failed to copy {}: {}", file, e))
            })?;
            println!("  ✅ Downloaded: {}", file);
        }

        Ok(model_dir)
    }

    /// Known models plus anything else already sitting in the store
    pub async fn list(&self) -> Result<Vec<StoredModel>> {
        let downloaded = self.downloaded_repo_ids().await?;

        let mut models: Vec<StoredModel> = KNOWN_MODELS
            .iter()
            .map(|known| StoredModel {
                repo_id: known.repo_id.to_string(),
                downloaded: downloaded.iter().any(|id| id == known.repo_id),
                known: Some(known.clone()),
            })
            .collect();

        for repo_id in downloaded {
            if !KNOWN_MODELS.iter().any(|known| known.repo_id == repo_id) {
                models.push(StoredModel {
                    repo_id,
                    downloaded: true,
                    known: None,
                });
            }
        }

        Ok(models)
    }

    async fn downloaded_repo_ids(&self) -> Result<Vec<String>> {
        if !self.models_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.models_dir).await?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && has_required_files(&entry.path()).await {
                ids.push(entry.file_name().to_string_lossy().replace("--", "/"));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

async fn has_required_files(dir: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(dir.join(file)).await.is_err() {
            return false;
        }
    }
    true
}
