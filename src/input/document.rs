//! Source documents and chunking

use crate::error::{Result, ResumeRefinerError};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Artifacts left behind by PDF text extraction of bullet glyphs
const EXTRACTION_ARTIFACTS: [&str; 3] = ["â– ", "ï¿½", "\u{FFFD}"];

/// Raw text of one ingested file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub chunk_id: usize,
    /// Byte offsets into the source text
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, chunk_id: usize) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            metadata: ChunkMetadata {
                source: source.into(),
                chunk_id,
                start: 0,
                end,
            },
        }
    }
}

/// Strip extraction artifacts and normalize line endings
pub fn clean_extracted_text(text: &str) -> String {
    let mut cleaned = text.replace("\r\n", "\n");
    for artifact in EXTRACTION_ARTIFACTS {
        cleaned = cleaned.replace(artifact, "");
    }
    cleaned
}

impl SourceDocument {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Split into overlapping chunks of at most `chunk_size` characters.
    ///
    /// Chunks end on Unicode word boundaries; a single word longer than
    /// `chunk_size` becomes its own chunk. Consecutive chunks share up to
    /// `overlap` characters.
    pub fn chunk(&self, chunk_size: usize, overlap: usize) -> Result<Vec<DocumentChunk>> {
        if chunk_size <= overlap {
            return Err(ResumeRefinerError::InvalidInput(
                "Chunk size must be greater than overlap".to_string(),
            ));
        }

        let segments: Vec<(usize, &str)> = self.text.split_word_bound_indices().collect();
        let mut chunks = Vec::new();
        let mut first = 0;

        while first < segments.len() {
            let mut last = first;
            let mut length = 0;
            while last < segments.len() {
                let segment_length = segments[last].1.chars().count();
                if length > 0 && length + segment_length > chunk_size {
                    break;
                }
                length += segment_length;
                last += 1;
            }

            let start = segments[first].0;
            let end = segments.get(last).map(|(offset, _)| *offset).unwrap_or(self.text.len());
            let content = self.text[start..end].trim();

            if !content.is_empty() {
                chunks.push(DocumentChunk {
                    text: content.to_string(),
                    metadata: ChunkMetadata {
                        source: self.source.clone(),
                        chunk_id: chunks.len(),
                        start,
                        end,
                    },
                });
            }

            if last >= segments.len() {
                break;
            }

            // Rewind by up to `overlap` characters, always moving forward
            let mut next = last;
            let mut rewound = 0;
            while next > first + 1 {
                let segment_length = segments[next - 1].1.chars().count();
                if rewound + segment_length > overlap {
                    break;
                }
                rewound += segment_length;
                next -= 1;
            }
            first = next;
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_respects_size_and_order() {
        let doc = SourceDocument::new(
            "cv.txt",
            "This is a test document with enough content to create multiple chunks when we set a small chunk size.",
        );

        let chunks = doc.chunk(30, 5).unwrap();
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(chunk.text.chars().count() <= 30);
            assert_eq!(chunk.metadata.chunk_id, i);
            assert_eq!(chunk.metadata.source, "cv.txt");
        }
        assert!(chunks.windows(2).all(|w| w[0].metadata.start < w[1].metadata.start));
        assert!(chunks.last().unwrap().text.ends_with("size."));
    }

    #[test]
    fn test_short_document_is_single_chunk() {
        let doc = SourceDocument::new("cv.txt", "Rust developer");
        let chunks = doc.chunk(100, 10).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Rust developer");
    }

    #[test]
    fn test_blank_document_has_no_chunks() {
        let doc = SourceDocument::new("cv.txt", "   \n  ");
        assert!(doc.chunk(100, 10).unwrap().is_empty());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let doc = SourceDocument::new("cv.txt", "text");
        assert!(doc.chunk(10, 10).is_err());
    }

    #[test]
    fn test_extraction_artifacts_removed() {
        let cleaned = clean_extracted_text("â– Led team\r\nï¿½Shipped \u{FFFD}code");
        assert_eq!(cleaned, "Led team\nShipped code");
    }
}
