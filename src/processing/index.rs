//! In-memory similarity index over resume chunks

use crate::error::{Result, ResumeRefinerError};
use crate::input::DocumentChunk;
use crate::processing::embeddings::{cosine_similarity, Embedder};
use log::debug;

#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk: DocumentChunk,
    embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity to the query
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a DocumentChunk,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    entries: Vec<IndexedChunk>,
}

impl SimilarityIndex {
    /// Embed every chunk. An empty chunk list is a missing-input error.
    pub fn build<E: Embedder>(embedder: &E, chunks: &[DocumentChunk]) -> Result<Self> {
        if chunks.is_empty() {
            return Err(ResumeRefinerError::MissingInput(
                "No documents to embed".to_string(),
            ));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts)?;
        if embeddings.len() != chunks.len() {
            return Err(ResumeRefinerError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries = chunks
            .iter()
            .cloned()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk { chunk, embedding })
            .collect();

        debug!(
            "Indexed {} chunks with {}",
            chunks.len(),
            embedder.model_name()
        );
        Ok(Self { entries })
    }

    /// Top `k` chunks by cosine similarity, best first. Ties keep index order.
    pub fn query<E: Embedder>(
        &self,
        embedder: &E,
        text: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk<'_>>> {
        let query_embedding = embedder.embed(text)?;

        let mut scored = self
            .entries
            .iter()
            .map(|entry| {
                Ok(ScoredChunk {
                    chunk: &entry.chunk,
                    score: cosine_similarity(&query_embedding, &entry.embedding)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
