//! Structured shapes the completion service is asked to fill in

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Attributes extracted from the resume. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ResumeAttributes {
    /// List of key skills from the resume
    pub key_skills: Vec<String>,
    /// Professional experience statements, most relevant first
    pub professional_experience: Vec<String>,
    /// Education entries
    pub education: Vec<String>,
    /// Key projects mentioned in the resume
    pub notable_projects: Vec<String>,
    /// Analysis of career growth and progression
    pub career_progression: String,
}

impl ResumeAttributes {
    pub fn is_empty(&self) -> bool {
        self.key_skills.iter().all(|s| s.trim().is_empty())
            && self.professional_experience.iter().all(|e| e.trim().is_empty())
            && self.education.iter().all(|e| e.trim().is_empty())
            && self.notable_projects.iter().all(|p| p.trim().is_empty())
            && self.career_progression.trim().is_empty()
    }

    /// Skills, experience, education and projects joined by single spaces.
    /// Career progression is not part of the scored text.
    pub fn scoring_text(&self) -> String {
        self.key_skills
            .iter()
            .chain(&self.professional_experience)
            .chain(&self.education)
            .chain(&self.notable_projects)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OptimizationSuggestions {
    /// Key findings from the analysis
    pub key_findings: Vec<String>,
    /// Specific improvements suggested
    pub specific_improvements: Vec<String>,
    /// Actionable items for the user
    pub action_items: Vec<String>,
}

impl OptimizationSuggestions {
    pub fn is_empty(&self) -> bool {
        self.key_findings.is_empty()
            && self.specific_improvements.is_empty()
            && self.action_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let attrs: ResumeAttributes =
            serde_json::from_str(r#"{"key_skills": ["Rust"]}"#).unwrap();
        assert_eq!(attrs.key_skills, vec!["Rust"]);
        assert!(attrs.education.is_empty());
        assert!(!attrs.is_empty());
    }

    #[test]
    fn test_scoring_text_excludes_career_progression() {
        let attrs = ResumeAttributes {
            key_skills: vec!["Python".into(), "Docker".into()],
            professional_experience: vec!["5 years backend".into(), "Led platform team".into()],
            education: vec!["BSc".into(), "AWS certified".into()],
            notable_projects: vec!["CLI tool".into()],
            career_progression: "Promoted twice".into(),
        };
        assert_eq!(
            attrs.scoring_text(),
            "Python Docker 5 years backend Led platform team BSc AWS certified CLI tool"
        );
    }

    #[test]
    fn test_whitespace_only_attributes_are_empty() {
        let attrs = ResumeAttributes {
            key_skills: vec![" ".into()],
            education: vec!["\n".into()],
            ..Default::default()
        };
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_experience_and_education_lists_deserialize() {
        let attrs: ResumeAttributes = serde_json::from_str(
            r#"{"key_skills": ["Python"], "professional_experience": ["Built APIs at Acme", "Led team at Beta"], "education": ["BSc CS"]}"#,
        )
        .unwrap();
        assert_eq!(
            attrs.professional_experience,
            vec!["Built APIs at Acme", "Led team at Beta"]
        );
        assert_eq!(attrs.education, vec!["BSc CS"]);
        assert_eq!(
            attrs.scoring_text(),
            "Python Built APIs at Acme Led team at Beta BSc CS"
        );
    }
}
