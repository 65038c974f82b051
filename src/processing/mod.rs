//! Embeddings, retrieval and scoring

pub mod ats_scorer;
pub mod embeddings;
pub mod index;
pub mod keywords;
pub mod model_store;

pub use ats_scorer::{AtsScorer, ScoreBreakdown};
pub use embeddings::{Embedder, Model2VecEmbedder};
pub use index::SimilarityIndex;
pub use keywords::{extract_keywords, KeywordAnalysis, KeywordRow};
pub use model_store::ModelStore;
