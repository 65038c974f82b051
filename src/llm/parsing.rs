//! Cleaning and parsing of raw completion text into structured records

use crate::error::{Result, ResumeRefinerError};
use log::debug;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

/// Remove `<think>...</think>` reasoning blocks
pub fn strip_think_tags(text: &str) -> String {
    static THINK_RE: OnceLock<Regex> = OnceLock::new();
    let re = THINK_RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think regex"));
    re.replace_all(text, "").into_owned()
}

/// Remove markdown code-fence markers, including a case-insensitive `json` tag
pub fn strip_code_fences(text: &str) -> String {
    static FENCE_RE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE_RE.get_or_init(|| Regex::new(r"(?i)```json|```").expect("valid fence regex"));
    re.replace_all(text, "").into_owned()
}

pub fn clean_llm_output(text: &str) -> String {
    strip_code_fences(&strip_think_tags(text)).trim().to_string()
}

/// Parse cleaned completion text into `T`.
///
/// When prose surrounds the payload, the span from the first `{` to the
/// last `}` is tried before giving up.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = clean_llm_output(raw);
    if cleaned.is_empty() {
        return Err(ResumeRefinerError::SchemaParse(
            "completion was empty after cleaning".to_string(),
        ));
    }

    let first_error = match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(candidate) = outermost_object(&cleaned) {
        if candidate.len() < cleaned.len() {
            if let Ok(value) = serde_json::from_str::<T>(candidate) {
                debug!("Recovered JSON object from surrounding text");
                return Ok(value);
            }
        }
    }

    let preview: String = cleaned.chars().take(120).collect();
    Err(ResumeRefinerError::SchemaParse(format!(
        "{} (output starts with: {:?})",
        first_error, preview
    )))
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
