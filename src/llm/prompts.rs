//! Prompt templates and optimization objectives

use crate::llm::schema::{OptimizationSuggestions, ResumeAttributes};
use clap::ValueEnum;
use regex::{Captures, Regex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Focus of a suggestion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationObjective {
    #[default]
    AtsKeywordOptimizer,
    ExperienceSectionEnhancer,
    SkillsHierarchyCreator,
    ProfessionalSummaryCrafter,
    EducationOptimizer,
    TechnicalSkillsShowcase,
    CareerGapFraming,
}

impl OptimizationObjective {
    pub const ALL: [OptimizationObjective; 7] = [
        Self::AtsKeywordOptimizer,
        Self::ExperienceSectionEnhancer,
        Self::SkillsHierarchyCreator,
        Self::ProfessionalSummaryCrafter,
        Self::EducationOptimizer,
        Self::TechnicalSkillsShowcase,
        Self::CareerGapFraming,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AtsKeywordOptimizer => "ATS Keyword Optimizer",
            Self::ExperienceSectionEnhancer => "Experience Section Enhancer",
            Self::SkillsHierarchyCreator => "Skills Hierarchy Creator",
            Self::ProfessionalSummaryCrafter => "Professional Summary Crafter",
            Self::EducationOptimizer => "Education Optimizer",
            Self::TechnicalSkillsShowcase => "Technical Skills Showcase",
            Self::CareerGapFraming => "Career Gap Framing",
        }
    }

    /// The request text sent to the completion service
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::AtsKeywordOptimizer => "Optimize resume for ATS",
            Self::ExperienceSectionEnhancer => "Improve experience section",
            Self::SkillsHierarchyCreator => "Improve skills section",
            Self::ProfessionalSummaryCrafter => "Improve summary",
            Self::EducationOptimizer => "Improve education",
            Self::TechnicalSkillsShowcase => "Improve tech skills",
            Self::CareerGapFraming => "Improve career gap",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|objective| objective.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for OptimizationObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const FORMAT_INSTRUCTIONS_TEMPLATE: &str = r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {"properties": {"foo": {"type": "array", "items": {"type": "string"}}}, "required": ["foo"]}
the object {"foo": ["bar", "baz"]} is a well-formatted instance of the schema.

Here is the output schema:
```
{schema}
```"#;

const EXTRACTION_TEMPLATE: &str = r#"Please provide a JSON object strictly matching the schema below.
Do not include any explanations or other text.

{format_instructions}

Resume Content:
{context}"#;

const SUGGESTION_TEMPLATE: &str = r#"Please provide a JSON object strictly matching the schema below.
Do not include any explanations or other text.

{format_instructions}

Resume Analysis:
{analysis}

Job Title: {job_title}
Job Description: {job_description}

Optimization Request: {request}"#;

const REWRITE_TEMPLATE: &str = r#"You are an expert resume editor.

Improve the resume below for the target job while following these STRICT RULES:

1. Keep the exact same layout and section order.
2. Keep every section heading exactly as written.
3. Do not remove any content.
4. Only improve the wording of existing bullet points.
5. Add missing ATS keywords from the job description where they fit naturally.
6. Add any extra tech stack inside the existing Skills section only.
7. Do not add explanations, notes or commentary.

Job Description:
{job_description}

Resume:
{resume}

Return ONLY the improved resume."#;

/// Substitute `{name}` placeholders in one pass so inserted text is never re-expanded
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER_RE
        .get_or_init(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

    re.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Instructions describing the JSON shape expected back for `T`
pub fn format_instructions<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    let schema_json = serde_json::to_string(&schema).unwrap_or_default();
    fill(FORMAT_INSTRUCTIONS_TEMPLATE, &[("schema", schema_json.as_str())])
}

pub fn render_extraction(context: &str) -> String {
    let instructions = format_instructions::<ResumeAttributes>();
    fill(
        EXTRACTION_TEMPLATE,
        &[
            ("format_instructions", instructions.as_str()),
            ("context", context),
        ],
    )
}

#[derive(Debug, Clone)]
pub struct SuggestionParams<'a> {
    pub resume_attributes: &'a ResumeAttributes,
    pub job_title: &'a str,
    pub job_description: &'a str,
    pub objective: OptimizationObjective,
}

pub fn render_suggestions(params: &SuggestionParams<'_>) -> String {
    let instructions = format_instructions::<OptimizationSuggestions>();
    let analysis = serde_json::to_string(params.resume_attributes).unwrap_or_default();
    fill(
        SUGGESTION_TEMPLATE,
        &[
            ("format_instructions", instructions.as_str()),
            ("analysis", analysis.as_str()),
            ("job_title", params.job_title),
            ("job_description", params.job_description),
            ("request", params.objective.instruction()),
        ],
    )
}

pub fn render_rewrite(resume: &str, job_description: &str) -> String {
    fill(
        REWRITE_TEMPLATE,
        &[("job_description", job_description), ("resume", resume)],
    )
}
