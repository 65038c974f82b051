//! Job-description keyword ranking and resume coverage

use crate::llm::schema::ResumeAttributes;
use crate::processing::ats_scorer::word_tokens;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MAX_KEYWORDS: usize = 15;
/// Tokens must be longer than this many characters to count as keywords
pub const MIN_KEYWORD_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRow {
    pub keyword: String,
    pub job_frequency: usize,
    pub resume_occurrences: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub rows: Vec<KeywordRow>,
    /// Keywords from `rows` that never occur in the resume, same order
    pub missing: Vec<String>,
}

/// Most frequent job-description tokens, ties broken by first appearance
pub fn rank_job_keywords(job_description: &str, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in word_tokens(job_description)
        .into_iter()
        .filter(|token| token.chars().count() > MIN_KEYWORD_LEN)
        .enumerate()
    {
        counts.entry(token).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(token, (count, first_seen))| (token, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(token, count, _)| (token, count))
        .collect()
}

/// Count each ranked keyword as a raw substring of the lowercased resume text
pub fn extract_keywords(attributes: &ResumeAttributes, job_description: &str) -> KeywordAnalysis {
    let resume_text = attributes.scoring_text().to_lowercase();

    let rows: Vec<KeywordRow> = rank_job_keywords(job_description, MAX_KEYWORDS)
        .into_iter()
        .map(|(keyword, job_frequency)| KeywordRow {
            resume_occurrences: resume_text.matches(keyword.as_str()).count(),
            keyword,
            job_frequency,
        })
        .collect();

    let missing = rows
        .iter()
        .filter(|row| row.resume_occurrences == 0)
        .map(|row| row.keyword.clone())
        .collect();

    KeywordAnalysis { rows, missing }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume_with(skills: &[&str], experience: &str) -> ResumeAttributes {
        ResumeAttributes {
            key_skills: skills.iter().map(|s| s.to_string()).collect(),
            professional_experience: vec![experience.to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_ranking_orders_by_frequency_then_first_seen() {
        let ranked = rank_job_keywords("pipeline data Pipeline DATA cloud", 15);
        assert_eq!(
            ranked,
            vec![
                ("pipeline".to_string(), 2),
                ("data".to_string(), 2),
                ("cloud".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_short_tokens_excluded() {
        let ranked = rank_job_keywords("Go and AWS for SRE work", 15);
        assert_eq!(ranked, vec![("work".to_string(), 1)]);
    }

    #[test]
    fn test_ranking_caps_at_limit() {
        let jd = (0..30)
            .map(|i| format!("keyword{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rank_job_keywords(&jd, MAX_KEYWORDS).len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_missing_keywords_for_backend_role() {
        let jd = "Looking for a Senior Backend Engineer with strong Python and Kubernetes skills";
        let analysis = extract_keywords(&resume_with(&["Python"], ""), jd);

        assert!(analysis.missing.contains(&"kubernetes".to_string()));
        assert!(!analysis.missing.contains(&"python".to_string()));

        let python = analysis.rows.iter().find(|r| r.keyword == "python").unwrap();
        assert_eq!(python.resume_occurrences, 1);
        assert!(analysis
            .missing
            .iter()
            .all(|kw| analysis.rows.iter().any(|r| &r.keyword == kw)));
    }

    #[test]
    fn test_missing_is_every_zero_count_row_in_rank_order() {
        let jd = "terraform kafka python terraform python kafka python grafana terraform python";
        let analysis = extract_keywords(&resume_with(&["Python", "Grafana"], ""), jd);

        let ranked: Vec<&str> = analysis.rows.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(ranked, vec!["python", "terraform", "kafka", "grafana"]);
        assert_eq!(analysis.missing, vec!["terraform", "kafka"]);
        assert_eq!(
            analysis.missing,
            analysis
                .rows
                .iter()
                .filter(|r| r.resume_occurrences == 0)
                .map(|r| r.keyword.clone())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_occurrences_count_substrings() {
        let analysis = extract_keywords(
            &resume_with(&["Java", "JavaScript"], "java services"),
            "Java engineer",
        );
        let java = analysis.rows.iter().find(|r| r.keyword == "java").unwrap();
        assert_eq!(java.resume_occurrences, 3);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let attrs = resume_with(&["Rust", "Tokio"], "Built async services in rust");
        let jd = "Rust engineer: async rust, tokio, services, services, latency";
        assert_eq!(extract_keywords(&attrs, jd), extract_keywords(&attrs, jd));
    }
}
