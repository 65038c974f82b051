//! Document ingestion
//! Handles file detection, text extraction, cleanup and chunking

pub mod document;
pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use document::{ChunkMetadata, DocumentChunk, SourceDocument};
pub use manager::InputManager;
