//! Deterministic stand-ins for the embedding and completion capabilities

use crate::error::{Result, ResumeRefinerError};
use crate::llm::client::Completer;
use crate::processing::ats_scorer::word_tokens;
use crate::processing::embeddings::Embedder;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const VOCABULARY: &[&str] = &[
    "python", "rust", "go", "java", "sql", "docker", "kubernetes", "aws", "terraform", "backend",
    "frontend", "data", "pipelines", "services", "education", "mathematics", "engineer", "senior",
];

/// Bag-of-words vectors over a small fixed vocabulary, plus a bias term so
/// no vector is all zeros
#[derive(Default)]
pub struct VocabularyEmbedder {
    calls: AtomicUsize,
}

impl VocabularyEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for VocabularyEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tokens = word_tokens(text);
        let mut vector: Vec<f32> = VOCABULARY
            .iter()
            .map(|term| tokens.iter().filter(|t| t == term).count() as f32)
            .collect();
        vector.push(0.1);
        Ok(vector)
    }

    fn model_name(&self) -> &str {
        "vocabulary-test"
    }
}

/// `[1, 0]` for the anchor text and a vector at the given cosine to it otherwise
pub struct FixedSimilarityEmbedder {
    anchor: String,
    similarity: f32,
}

impl FixedSimilarityEmbedder {
    pub fn new(anchor: &str, similarity: f32) -> Self {
        Self {
            anchor: anchor.trim().to_string(),
            similarity,
        }
    }
}

impl Embedder for FixedSimilarityEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim() == self.anchor {
            Ok(vec![1.0, 0.0])
        } else {
            let s = self.similarity;
            Ok(vec![s, (1.0 - s * s).max(0.0).sqrt()])
        }
    }

    fn model_name(&self) -> &str {
        "fixed-similarity-test"
    }
}

/// Embedder that always fails
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(ResumeRefinerError::Embedding("embedding backend offline".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing-test"
    }
}

/// Replays queued responses in order and records every prompt it receives
pub struct ScriptedCompleter {
    responses: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompleter {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Completer for ScriptedCompleter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ResumeRefinerError::Completion("no scripted response left".to_string())))
    }

    fn model_name(&self) -> &str {
        "scripted-test"
    }
}
