//! End-to-end optimization runs against deterministic embedding and completion stand-ins

mod common;

use common::{FixedSimilarityEmbedder, ScriptedCompleter, ATTRIBUTES_JSON, SUGGESTIONS_JSON};
use resume_refiner::input::InputManager;
use resume_refiner::llm::{OptimizationObjective, ResumeAttributes};
use resume_refiner::output::{OptimizationReport, ReportContext};
use resume_refiner::pipeline::{
    IssueKind, OptimizationRequest, Orchestrator, PipelineSettings, Stage, Termination,
};
use resume_refiner::processing::{extract_keywords, AtsScorer};
use std::path::Path;

async fn job_description() -> String {
    let mut manager = InputManager::new();
    manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap()
}

async fn resume_request(job_description: &str) -> OptimizationRequest {
    let mut manager = InputManager::new();
    let document = manager
        .load_document(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();
    OptimizationRequest::new(
        document.chunk(400, 50).unwrap(),
        "Senior Backend Engineer",
        job_description,
    )
}

fn context<'a>(job_description: &'a str) -> ReportContext<'a> {
    ReportContext {
        resume_source: "sample_resume.txt",
        job_title: "Senior Backend Engineer",
        job_description,
        objective: OptimizationObjective::default(),
        language_model: "scripted",
    }
}

#[tokio::test]
async fn test_full_run_produces_scored_report() {
    let jd = job_description().await;
    let orchestrator = Orchestrator::new(
        FixedSimilarityEmbedder::new(&jd, 0.8),
        ScriptedCompleter::new(vec![
            Ok(ATTRIBUTES_JSON.to_string()),
            Ok(SUGGESTIONS_JSON.to_string()),
        ]),
        PipelineSettings::default(),
    );

    let outcome = orchestrator.run(resume_request(&jd).await).await.unwrap();
    assert_eq!(outcome.termination, Termination::Completed);
    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.resume_attributes.key_skills.len(), 4);
    assert_eq!(outcome.optimization_suggestions.action_items.len(), 2);

    let report = OptimizationReport::build(orchestrator.embedder(), &context(&jd), outcome).unwrap();
    assert!(!report.degraded);
    assert_eq!(report.breakdown.semantic, 48);
    // Python and AWS appear in the job description; Docker and PostgreSQL do not
    assert_eq!(report.breakdown.skill, 6);
    assert_eq!(report.score, report.breakdown.total());
    assert!(report.missing_keywords.contains(&"kubernetes".to_string()));
    assert!(!report.missing_keywords.contains(&"python".to_string()));

    let prompts = orchestrator.completer().prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("Resume Content:"));
    assert!(prompts[1].ends_with("Optimization Request: Optimize resume for ATS"));
}

#[tokio::test]
async fn test_unparseable_completions_degrade_to_empty_defaults() {
    let jd = job_description().await;
    let orchestrator = Orchestrator::new(
        FixedSimilarityEmbedder::new(&jd, 0.8),
        ScriptedCompleter::repeating("I am unable to produce JSON right now.", 2),
        PipelineSettings::default(),
    );

    let outcome = orchestrator.run(resume_request(&jd).await).await.unwrap();
    assert_eq!(outcome.resume_attributes, ResumeAttributes::default());
    assert!(outcome.optimization_suggestions.is_empty());
    assert_eq!(outcome.issues.len(), 2);
    assert!(outcome
        .issues
        .iter()
        .all(|issue| issue.kind == IssueKind::SchemaParseFailure));

    let embedder = FixedSimilarityEmbedder::new(&jd, 0.8);
    let report = OptimizationReport::build(&embedder, &context(&jd), outcome).unwrap();
    assert!(report.degraded);
    assert_eq!(report.score, 0);
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_reanalysis_loops_until_pass_limit() {
    let jd = job_description().await;
    let mut responses = Vec::new();
    for _ in 0..3 {
        responses.push(Ok(ATTRIBUTES_JSON.to_string()));
        responses.push(Ok(SUGGESTIONS_JSON.to_string()));
    }
    let orchestrator = Orchestrator::new(
        FixedSimilarityEmbedder::new(&jd, 0.8),
        ScriptedCompleter::new(responses),
        PipelineSettings {
            retrieval_k: 5,
            max_passes: 3,
        },
    );

    let request = resume_request(&jd).await.with_reanalysis(true);
    let outcome = orchestrator.run(request).await.unwrap();

    assert_eq!(outcome.termination, Termination::ReanalysisLimitReached);
    assert_eq!(outcome.passes, 3);
    assert_eq!(
        outcome.trace.iter().filter(|s| **s == Stage::Gating).count(),
        3
    );
    assert!(outcome.issues.is_empty());
}

#[tokio::test]
async fn test_no_trigger_terminates_after_one_pass() {
    let jd = job_description().await;
    let orchestrator = Orchestrator::new(
        FixedSimilarityEmbedder::new(&jd, 0.8),
        ScriptedCompleter::new(vec![
            Ok(ATTRIBUTES_JSON.to_string()),
            Ok(SUGGESTIONS_JSON.to_string()),
        ]),
        PipelineSettings::default(),
    );

    let outcome = orchestrator.run(resume_request(&jd).await).await.unwrap();
    assert_eq!(outcome.passes, 1);
    assert_eq!(outcome.trace.last(), Some(&Stage::Done));
}

#[test]
fn test_score_components_respect_caps() {
    let jd = "python python rust go sql aws docker kubernetes terraform kafka";
    let embedder = FixedSimilarityEmbedder::new(jd, 1.0);
    let scorer = AtsScorer::new(&embedder);
    let attrs = ResumeAttributes {
        key_skills: ["python", "rust", "go", "sql", "aws", "docker", "kubernetes", "terraform"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        professional_experience: vec!["kafka".into()],
        ..Default::default()
    };

    let breakdown = scorer.breakdown(&attrs, jd).unwrap();
    assert_eq!(breakdown.semantic, 60);
    assert_eq!(breakdown.keyword, 25);
    assert_eq!(breakdown.skill, 15);
    assert_eq!(scorer.score(&attrs, jd).unwrap(), 100);
}

#[test]
fn test_python_docker_skill_matches() {
    let jd = "Python developer with AWS and Docker experience";
    let embedder = FixedSimilarityEmbedder::new(jd, 0.8);
    let attrs = ResumeAttributes {
        key_skills: vec!["Python".into(), "Docker".into()],
        ..Default::default()
    };
    let breakdown = AtsScorer::new(&embedder).breakdown(&attrs, jd).unwrap();
    assert_eq!(breakdown.skill, 6);
}

#[test]
fn test_keyword_extraction_is_idempotent_and_missing_matches_zero_rows() {
    let jd = "Looking for a Senior Backend Engineer with strong Python and Kubernetes skills";
    let attrs = ResumeAttributes {
        key_skills: vec!["Python".into()],
        ..Default::default()
    };

    let first = extract_keywords(&attrs, jd);
    let second = extract_keywords(&attrs, jd);
    assert_eq!(first, second);
    assert!(first.missing.contains(&"kubernetes".to_string()));
    assert!(!first.missing.contains(&"python".to_string()));
    assert_eq!(
        first.missing,
        first
            .rows
            .iter()
            .filter(|row| row.resume_occurrences == 0)
            .map(|row| row.keyword.clone())
            .collect::<Vec<_>>()
    );
}
