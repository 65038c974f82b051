//! Embedding generation using Model2Vec

use crate::config::Config;
use crate::error::{Result, ResumeRefinerError};
use crate::processing::model_store::ModelStore;
use log::info;
use model2vec_rs::model::StaticModel;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Capability for turning text into fixed-length vectors.
///
/// Identical input must produce identical (or near-identical) vectors for
/// the lifetime of the embedder, since the same instance serves both the
/// similarity index and the semantic score.
pub trait Embedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn model_name(&self) -> &str;
}

/// Cached embeddings kept per embedder before the oldest are evicted
const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Text-keyed embedding cache that evicts in insertion order once full
struct EmbeddingCache {
    capacity: usize,
    entries: HashMap<String, Vec<f32>>,
    order: VecDeque<String>,
}

impl EmbeddingCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, text: &str) -> Option<&Vec<f32>> {
        self.entries.get(text)
    }

    fn insert(&mut self, text: String, embedding: Vec<f32>) {
        if self.capacity == 0 || self.entries.contains_key(&text) {
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(text.clone());
        self.entries.insert(text, embedding);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Static Model2Vec embeddings with a bounded in-memory cache keyed by text
pub struct Model2VecEmbedder {
    model: StaticModel,
    cache: Mutex<EmbeddingCache>,
    model_name: String,
}

impl Model2VecEmbedder {
    pub fn load(model_path: &Path, model_name: impl Into<String>) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None)?;

        info!("Embedding model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            cache: Mutex::new(EmbeddingCache::new(DEFAULT_CACHE_CAPACITY)),
            model_name: model_name.into(),
        })
    }

    /// Resolve the configured model through the local store, downloading it if needed
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = ModelStore::new(config.models_dir());
        let model_id = &config.models.embedding_model;
        let model_path = store.ensure_available(model_id).await?;
        Self::load(&model_path, model_id.clone())
    }

    pub fn cache_size(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    fn lock_cache(&self) -> Result<std::sync::MutexGuard<'_, EmbeddingCache>> {
        self.cache
            .lock()
            .map_err(|_| ResumeRefinerError::Embedding("embedding cache poisoned".to_string()))
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.lock_cache()?.get(text) {
            return Ok(cached.clone());
        }

        let embedding = self.model.encode_single(text);
        self.lock_cache()?.insert(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut uncached = Vec::new();
        let mut uncached_indices = Vec::new();

        {
            let cache = self.lock_cache()?;
            for (i, text) in texts.iter().enumerate() {
                match cache.get(text) {
                    Some(embedding) => results.push(Some(embedding.clone())),
                    None => {
                        results.push(None);
                        uncached.push(text.clone());
                        uncached_indices.push(i);
                    }
                }
            }
        }

        if !uncached.is_empty() {
            let embeddings = self.model.encode(&uncached);
            if embeddings.len() != uncached.len() {
                return Err(ResumeRefinerError::Embedding(format!(
                    "Model returned {} embeddings for {} texts",
                    embeddings.len(),
                    uncached.len()
                )));
            }

            let mut cache = self.lock_cache()?;
            for ((index, text), embedding) in uncached_indices.into_iter().zip(uncached).zip(embeddings) {
                cache.insert(text, embedding.clone());
                results[index] = Some(embedding);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity in [-1, 1]; zero vectors compare as 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeRefinerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
    }
}
