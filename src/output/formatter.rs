//! Console, JSON and markdown renderers for optimization reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeRefinerError};
use crate::llm::rewriter::HighlightedLine;
use crate::output::report::{OptimizationReport, ScoreBand};
use crate::pipeline::state::Termination;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &OptimizationReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8, band: ScoreBand) -> String {
        let color = match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Moderate => Color::Yellow,
            ScoreBand::Weak => Color::Red,
        };
        let text = format!("{}% [{}]", score, band.label());
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text
        }
    }

    fn push_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&self.format_header(title, 3));
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &OptimizationReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME OPTIMIZATION REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Role: {} | Objective: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.job_title,
            report.objective
        ));

        output.push_str(&self.format_header("ATS Score", 2));
        output.push_str(&format!(
            "Overall: {}\n",
            self.format_score_badge(report.score, report.band)
        ));
        output.push_str(&format!(
            "  🎯 Semantic match: {}/60\n  🔍 Keyword overlap: {}/25\n  🛠  Skill matches: {}/15\n",
            report.breakdown.semantic, report.breakdown.keyword, report.breakdown.skill
        ));

        if report.degraded {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize(
                    "⚠️  Resume attributes could not be extracted; the score is not meaningful.",
                    Color::Red
                )
            ));
        }

        let missing = report.shown_missing_keywords();
        if !missing.is_empty() {
            output.push_str(&self.format_header("🔑 Missing Keywords", 2));
            output.push_str(&format!("  {}\n", self.colorize(&missing.join(", "), Color::Yellow)));
        }

        output.push_str(&self.format_header("💡 Suggestions", 2));
        if report.suggestions.is_empty() {
            output.push_str("  No suggestions were produced.\n");
        }
        self.push_list(&mut output, "Key Findings", &report.suggestions.key_findings, Color::Cyan);
        self.push_list(
            &mut output,
            "Specific Improvements",
            &report.suggestions.specific_improvements,
            Color::White,
        );
        self.push_list(&mut output, "Action Items", &report.suggestions.action_items, Color::Green);

        if self.detailed {
            output.push_str(&self.format_header("📋 Extracted Resume Attributes", 2));
            let attrs = &report.resume_attributes;
            output.push_str(&format!("Skills: {}\n", attrs.key_skills.join(", ")));
            output.push_str(&format!("Experience: {}\n", attrs.professional_experience.join("; ")));
            output.push_str(&format!("Education: {}\n", attrs.education.join("; ")));
            if !attrs.notable_projects.is_empty() {
                output.push_str(&format!("Projects: {}\n", attrs.notable_projects.join("; ")));
            }
            output.push_str(&format!("Career progression: {}\n", attrs.career_progression));

            output.push_str(&self.format_header("🔍 Keyword Coverage", 2));
            output.push_str(&format!("  {:<20} {:>8} {:>8}\n", "Keyword", "Job", "Resume"));
            for row in &report.keywords {
                let line = format!(
                    "  {:<20} {:>8} {:>8}",
                    row.keyword, row.job_frequency, row.resume_occurrences
                );
                let color = if row.resume_occurrences == 0 {
                    Color::Red
                } else {
                    Color::Green
                };
                output.push_str(&format!("{}\n", self.colorize(&line, color)));
            }

            output.push_str(&self.format_header("⚙️  Run Details", 2));
            output.push_str(&format!("Passes: {}\n", report.passes));
            if report.termination == Termination::ReanalysisLimitReached {
                output.push_str("Stopped at the reanalysis pass limit\n");
            }
            output.push_str(&format!(
                "Models: {} (embeddings), {} (language)\n",
                report.metadata.embedding_model, report.metadata.language_model
            ));
        }

        if !report.issues.is_empty() {
            output.push_str(&self.format_header("⚠️  Issues", 3));
            for issue in &report.issues {
                output.push_str(&format!(
                    "  [{}] {:?}: {}\n",
                    issue.stage,
                    issue.kind,
                    self.colorize(&issue.message, Color::BrightBlack)
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &OptimizationReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(band: ScoreBand) -> &'static str {
        match band {
            ScoreBand::Strong => "🟢",
            ScoreBand::Moderate => "🟡",
            ScoreBand::Weak => "🔴",
        }
    }

    fn push_list(output: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("### {}\n\n", title));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &OptimizationReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Optimization Report\n\n");
        output.push_str(&format!("**Role:** {}  \n", report.job_title));
        output.push_str(&format!("**Objective:** {}\n\n", report.objective));

        output.push_str("## ATS Score\n\n");
        output.push_str(&format!(
            "{} **{}%** ({})\n\n",
            Self::markdown_score_badge(report.band),
            report.score,
            report.band.label()
        ));
        output.push_str("| Component | Points | Max |\n|---|---|---|\n");
        output.push_str(&format!("| Semantic match | {} | 60 |\n", report.breakdown.semantic));
        output.push_str(&format!("| Keyword overlap | {} | 25 |\n", report.breakdown.keyword));
        output.push_str(&format!("| Skill matches | {} | 15 |\n\n", report.breakdown.skill));

        if report.degraded {
            output.push_str(
                "> ⚠️ Resume attributes could not be extracted; the score is not meaningful.\n\n",
            );
        }

        let missing = report.shown_missing_keywords();
        if !missing.is_empty() {
            output.push_str("## Missing Keywords\n\n");
            output.push_str(
                &missing
                    .iter()
                    .map(|kw| format!("`{}`", kw))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            output.push_str("\n\n");
        }

        if !report.keywords.is_empty() {
            output.push_str("## Keyword Coverage\n\n| Keyword | Job | Resume |\n|---|---|---|\n");
            for row in &report.keywords {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    row.keyword, row.job_frequency, row.resume_occurrences
                ));
            }
            output.push('\n');
        }

        output.push_str("## Suggestions\n\n");
        Self::push_list(&mut output, "Key Findings", &report.suggestions.key_findings);
        Self::push_list(
            &mut output,
            "Specific Improvements",
            &report.suggestions.specific_improvements,
        );
        Self::push_list(&mut output, "Action Items", &report.suggestions.action_items);

        if !report.issues.is_empty() {
            output.push_str("## Issues\n\n");
            for issue in &report.issues {
                output.push_str(&format!("- **{}** ({:?}): {}\n", issue.stage, issue.kind, issue.message));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated {} by resume-refiner {} using {} and {}; {} pass(es).*\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.tool_version,
                report.metadata.embedding_model,
                report.metadata.language_model,
                report.passes
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Dispatches to the formatter for the requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &OptimizationReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        debug_assert_eq!(formatter.supports_format(), format);
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a rewritten resume, marking new lines with `+`
pub fn format_highlighted(lines: &[HighlightedLine], use_colors: bool) -> String {
    lines
        .iter()
        .map(|line| match (line.is_new, use_colors) {
            (true, true) => format!("+ {}", line.text.green().bold()),
            (true, false) => format!("+ {}", line.text),
            (false, _) => format!("  {}", line.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content).map_err(|e| {
        ResumeRefinerError::OutputFormatting(format!(
            "Failed to write {}: {}",
            file_path.display(),
            e
        ))
    })
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_report{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::OptimizationObjective;
    use crate::llm::schema::{OptimizationSuggestions, ResumeAttributes};
    use crate::output::report::ReportMetadata;
    use crate::pipeline::state::{IssueKind, PipelineIssue, Stage};
    use crate::processing::ats_scorer::ScoreBreakdown;
    use crate::processing::keywords::KeywordRow;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_report() -> OptimizationReport {
        let missing: Vec<String> = (0..12).map(|i| format!("missing{}", i)).collect();
        OptimizationReport {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                resume_source: "cv.txt".into(),
                embedding_model: "embed".into(),
                language_model: "llm".into(),
                tool_version: "0.1.0".into(),
            },
            job_title: "Backend Engineer".into(),
            objective: OptimizationObjective::SkillsHierarchyCreator,
            score: 75,
            band: ScoreBand::Strong,
            breakdown: ScoreBreakdown {
                semantic: 50,
                keyword: 15,
                skill: 10,
            },
            keywords: vec![KeywordRow {
                keyword: "python".into(),
                job_frequency: 3,
                resume_occurrences: 2,
            }],
            missing_keywords: missing,
            resume_attributes: ResumeAttributes {
                key_skills: vec!["Python".into()],
                ..Default::default()
            },
            suggestions: OptimizationSuggestions {
                key_findings: vec!["Strong Python".into()],
                specific_improvements: vec![],
                action_items: vec!["Add Kubernetes".into()],
            },
            termination: Termination::Completed,
            passes: 1,
            issues: vec![PipelineIssue {
                stage: Stage::Suggesting,
                kind: IssueKind::ServiceFailure,
                message: "timeout".into(),
            }],
            degraded: false,
        }
    }

    #[test]
    fn test_console_output_without_colors() {
        let output = ConsoleFormatter::new(false, true)
            .format_report(&sample_report())
            .unwrap();
        assert!(output.contains("75% [STRONG MATCH]"));
        assert!(output.contains("Skills Hierarchy Creator"));
        assert!(output.contains("missing9"));
        assert!(!output.contains("missing10"));
        assert!(output.contains("Add Kubernetes"));
        assert!(output.contains("[suggesting] ServiceFailure: timeout"));
        assert!(output.contains("python"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let json = JsonFormatter::new(true).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["score"], 75);
        assert_eq!(value["breakdown"]["semantic"], 50);
        assert_eq!(value["objective"], "skills-hierarchy-creator");
        assert_eq!(value["degraded"], false);
    }

    #[test]
    fn test_markdown_output_sections() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();
        assert!(output.starts_with("# Resume Optimization Report"));
        assert!(output.contains("| Semantic match | 50 | 60 |"));
        assert!(output.contains("`missing0`"));
        assert!(!output.contains("`missing11`"));
        assert!(output.contains("### Action Items"));
        assert!(!output.contains("### Specific Improvements"));
    }

    #[test]
    fn test_highlighted_rendering() {
        let lines = vec![
            HighlightedLine {
                text: "SKILLS".into(),
                is_new: false,
            },
            HighlightedLine {
                text: "Kubernetes".into(),
                is_new: true,
            },
        ];
        assert_eq!(format_highlighted(&lines, false), "  SKILLS\n+ Kubernetes");
    }

    #[test]
    fn test_save_and_suggest_filename() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("report.md");
        save_report_to_file("# hi", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi");

        assert_eq!(
            suggest_filename(OutputFormat::Json, "docs/jane_cv.pdf", false),
            "jane_cv_report.json"
        );
    }
}
