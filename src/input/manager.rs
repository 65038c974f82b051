//! Input manager for handling different file types

use crate::error::{Result, ResumeRefinerError};
use crate::input::document::{clean_extracted_text, SourceDocument};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeRefinerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                clean_extracted_text(&PdfExtractor.extract(path).await?)
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeRefinerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Extract a file into a `SourceDocument` labelled with its path
    pub async fn load_document(&mut self, path: &Path) -> Result<SourceDocument> {
        let text = self.extract_text(path).await?;
        Ok(SourceDocument::new(path.to_string_lossy(), text))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
