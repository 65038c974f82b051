//! Text extraction from various file formats

use crate::error::{Result, ResumeRefinerError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ResumeRefinerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

fn tag_regex() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"))
}

/// Render markdown to HTML, then strip tags and entities down to plain lines
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</li>", "\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let stripped = tag_regex().replace_all(&text, "");
    // &amp; last so that escaped entities are not decoded twice
    let stripped = stripped.replace("&amp;", "&");

    stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
