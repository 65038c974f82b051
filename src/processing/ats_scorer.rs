//! ATS compatibility scoring: semantic similarity, keyword overlap and skill matches

use crate::error::Result;
use crate::llm::schema::ResumeAttributes;
use crate::processing::embeddings::{cosine_similarity, Embedder};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

pub const SEMANTIC_WEIGHT: f64 = 60.0;
pub const KEYWORD_WEIGHT: f64 = 25.0;
pub const SKILL_POINTS_PER_MATCH: f64 = 3.0;
pub const SKILL_CAP: f64 = 15.0;
pub const MAX_SCORE: u8 = 100;

/// Rounded per-component contributions to the ATS score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0..=60
    pub semantic: u8,
    /// 0..=25
    pub keyword: u8,
    /// 0..=15
    pub skill: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        let sum = u16::from(self.semantic) + u16::from(self.keyword) + u16::from(self.skill);
        sum.min(u16::from(MAX_SCORE)) as u8
    }
}

/// Lowercased `\w+` tokens of `text`, in order of appearance
pub fn word_tokens(text: &str) -> Vec<String> {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    let re = WORD_RE.get_or_init(|| Regex::new(r"\b\w+\b").expect("valid word regex"));
    let lowered = text.to_lowercase();
    re.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Share of distinct job-description words that also appear in the resume, scaled to 25
pub fn keyword_component(resume_text: &str, job_description: &str) -> f64 {
    let jd_words: HashSet<String> = word_tokens(job_description).into_iter().collect();
    if jd_words.is_empty() {
        return 0.0;
    }
    let resume_words: HashSet<String> = word_tokens(resume_text).into_iter().collect();
    let overlap = jd_words.intersection(&resume_words).count();
    overlap as f64 / jd_words.len() as f64 * KEYWORD_WEIGHT
}

/// Three points per skill found verbatim (case-insensitive) in the job description, capped at 15
pub fn skill_component(skills: &[String], job_description: &str) -> f64 {
    let jd_lower = job_description.to_lowercase();
    let matches = skills
        .iter()
        .map(|skill| skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty() && jd_lower.contains(skill.as_str()))
        .count();
    (matches as f64 * SKILL_POINTS_PER_MATCH).min(SKILL_CAP)
}

pub fn semantic_component(similarity: f32) -> f64 {
    (f64::from(similarity) * SEMANTIC_WEIGHT).clamp(0.0, SEMANTIC_WEIGHT)
}

fn round_component(value: f64, cap: f64) -> u8 {
    value.clamp(0.0, cap).round_ties_even() as u8
}

pub struct AtsScorer<'a, E> {
    embedder: &'a E,
}

impl<'a, E: Embedder> AtsScorer<'a, E> {
    pub fn new(embedder: &'a E) -> Self {
        Self { embedder }
    }

    /// Overall score in 0..=100, the capped sum of the breakdown components
    pub fn score(&self, attributes: &ResumeAttributes, job_description: &str) -> Result<u8> {
        Ok(self.breakdown(attributes, job_description)?.total())
    }

    /// Empty attributes or a blank job description score zero without touching the embedder
    pub fn breakdown(
        &self,
        attributes: &ResumeAttributes,
        job_description: &str,
    ) -> Result<ScoreBreakdown> {
        let resume_text = attributes.scoring_text();
        if attributes.is_empty() || resume_text.trim().is_empty() || job_description.trim().is_empty()
        {
            debug!("Nothing to score, returning zero breakdown");
            return Ok(ScoreBreakdown::default());
        }

        let resume_embedding = self.embedder.embed(&resume_text)?;
        let jd_embedding = self.embedder.embed(job_description)?;
        let similarity = cosine_similarity(&resume_embedding, &jd_embedding)?;

        let semantic = semantic_component(similarity);
        let keyword = keyword_component(&resume_text, job_description);
        let skill = skill_component(&attributes.key_skills, job_description);
        debug!(
            "Score components: similarity={:.3} semantic={:.2} keyword={:.2} skill={:.2}",
            similarity, semantic, keyword, skill
        );

        Ok(ScoreBreakdown {
            semantic: round_component(semantic, SEMANTIC_WEIGHT),
            keyword: round_component(keyword, KEYWORD_WEIGHT),
            skill: round_component(skill, SKILL_CAP),
        })
    }
}
