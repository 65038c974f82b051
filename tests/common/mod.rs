#![allow(dead_code)]

use resume_refiner::error::{Result, ResumeRefinerError};
use resume_refiner::llm::Completer;
use resume_refiner::processing::Embedder;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Returns `[1, 0]` for the anchor text and a vector at cosine `similarity`
/// to it for anything else; counts calls.
pub struct FixedSimilarityEmbedder {
    anchor: String,
    similarity: f32,
    calls: AtomicUsize,
}

impl FixedSimilarityEmbedder {
    pub fn new(anchor: &str, similarity: f32) -> Self {
        Self {
            anchor: anchor.trim().to_string(),
            similarity,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for FixedSimilarityEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.trim() == self.anchor {
            Ok(vec![1.0, 0.0])
        } else {
            let s = self.similarity;
            Ok(vec![s, (1.0 - s * s).max(0.0).sqrt()])
        }
    }

    fn model_name(&self) -> &str {
        "fixed-similarity"
    }
}

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

    /// Answers every prompt with the same text
    pub fn repeating(response: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(response.to_string())).collect())
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
            .unwrap_or_else(|| Err(ResumeRefinerError::Completion("script exhausted".to_string())))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub const ATTRIBUTES_JSON: &str = r#"```json
{
  "key_skills": ["Python", "Docker", "AWS", "PostgreSQL"],
  "professional_experience": ["Six years building backend services and data pipelines in Python"],
  "education": ["BSc Computer Science"],
  "notable_projects": ["logslice CLI"],
  "career_progression": "Promoted to senior engineer in 2021"
}
```"#;

pub const SUGGESTIONS_JSON: &str = r#"<think>Kubernetes is missing.</think>
{"key_findings": ["No Kubernetes experience listed"],
 "specific_improvements": ["Mention container orchestration work"],
 "action_items": ["Add Kubernetes to skills if applicable", "Quantify pipeline impact"]}"#;
