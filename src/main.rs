//! resume-refiner: score a resume against a job description and improve it

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_refiner::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_refiner::config::Config;
use resume_refiner::error::{Result, ResumeRefinerError};
use resume_refiner::input::InputManager;
use resume_refiner::llm::{highlight_changes, ChatCompletionClient, Completer, ResumeRewriter};
use resume_refiner::output::formatter::{format_highlighted, save_report_to_file};
use resume_refiner::output::pdf::render_resume_pdf;
use resume_refiner::output::{OptimizationReport, ReportContext, ReportGenerator};
use resume_refiner::pipeline::{OptimizationRequest, Orchestrator, PipelineSettings};
use resume_refiner::processing::{Model2VecEmbedder, ModelStore};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let resetting = matches!(
        cli.command,
        Commands::Config {
            action: Some(ConfigAction::Reset)
        }
    );
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if resetting => {
            warn!("Ignoring unreadable configuration before reset: {}", e);
            Config::default()
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn invalid(message: String) -> ResumeRefinerError {
    ResumeRefinerError::InvalidInput(message)
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

async fn read_job_description(input_manager: &mut InputManager, job: &Path) -> Result<String> {
    cli::require_file(job, "Job description file").map_err(invalid)?;
    cli::validate_file_extension(job, &["txt", "md", "markdown"])
        .map_err(|e| invalid(format!("Job description file: {}", e)))?;
    let text = input_manager.extract_text(job).await?;
    cli::require_text(&text, "Job description").map_err(invalid)?;
    Ok(text)
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Optimize {
            resume,
            title,
            job,
            objective,
            reanalyze,
            output,
            save,
            detailed,
        } => {
            cli::require_text(&title, "Job title").map_err(invalid)?;
            cli::require_file(&resume, "Resume file").map_err(invalid)?;
            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| invalid(format!("Resume file: {}", e)))?;
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(invalid)?,
                None => config.output.format,
            };

            info!("Starting resume optimization for '{}'", title);
            println!("🚀 Resume optimization");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Role: {}", title);
            println!("🎯 Objective: {}", objective);

            let mut input_manager = InputManager::new();
            let job_description = read_job_description(&mut input_manager, &job).await?;
            let document = input_manager.load_document(&resume).await?;
            let chunks =
                document.chunk(config.retrieval.chunk_size, config.retrieval.chunk_overlap)?;
            println!("📂 Loaded {} chunk(s) from the resume", chunks.len());

            let embedder = Model2VecEmbedder::from_config(&config).await?;
            let completer = ChatCompletionClient::from_config(&config)?;
            let language_model = completer.model_name().to_string();
            let orchestrator =
                Orchestrator::new(embedder, completer, PipelineSettings::from_config(&config));

            let request = OptimizationRequest::new(chunks, title.clone(), job_description.clone())
                .with_objective(objective)
                .with_reanalysis(reanalyze);

            let progress = spinner("Analyzing resume and generating suggestions...");
            let outcome = orchestrator.run(request).await;
            progress.finish_and_clear();
            let outcome = outcome?;

            let report = OptimizationReport::build(
                orchestrator.embedder(),
                &ReportContext {
                    resume_source: &document.source,
                    job_title: &title,
                    job_description: &job_description,
                    objective,
                    language_model: &language_model,
                },
                outcome,
            )?;

            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed || config.output.detailed);
            let rendered = generator.generate_report(&report, output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Rewrite {
            resume,
            job,
            pdf,
            highlight,
        } => {
            cli::require_file(&resume, "Resume file").map_err(invalid)?;

            let mut input_manager = InputManager::new();
            let job_description = read_job_description(&mut input_manager, &job).await?;
            let original = input_manager.extract_text(&resume).await?;

            let completer = ChatCompletionClient::from_config(&config)?;
            let rewriter = ResumeRewriter::new(&completer);

            let progress = spinner("Rewriting resume...");
            let rewritten = rewriter.rewrite(&original, &job_description).await;
            progress.finish_and_clear();
            let rewritten = rewritten?;

            if highlight {
                let lines = highlight_changes(&original, &rewritten);
                let new_lines = lines.iter().filter(|l| l.is_new).count();
                println!("{}", format_highlighted(&lines, config.output.color_output));
                println!("\n✏️  {} new or substantially changed line(s)", new_lines);
            } else {
                println!("{}", rewritten);
            }

            if let Some(pdf_path) = pdf {
                let written = render_resume_pdf(&rewritten, &pdf_path)?;
                println!("📄 PDF written to {}", written.display());
            }
        }

        Commands::Models { action } => {
            let store = ModelStore::new(config.models_dir());
            match action {
                ModelAction::List => {
                    println!("🧠 Embedding models ({})\n", store.models_dir().display());
                    for model in store.list().await? {
                        let status = if model.downloaded { "✅" } else { "⬇️ " };
                        let marker = if model.repo_id == config.models.embedding_model {
                            " (configured)"
                        } else {
                            ""
                        };
                        println!("  {} {}{}", status, model.repo_id, marker);
                        if let Some(known) = &model.known {
                            println!(
                                "     {} | {} MB | {} dims",
                                known.description, known.size_mb, known.dimensions
                            );
                        }
                    }
                }
                ModelAction::Download { model } => {
                    let model = model.unwrap_or_else(|| config.models.embedding_model.clone());
                    if store.is_downloaded(&model).await {
                        println!("✅ Model '{}' is already downloaded", model);
                        return Ok(());
                    }
                    let path = store.download(&model).await?;
                    println!("✅ Model '{}' downloaded to {}", model, path.display());
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeRefinerError::Configuration(format!("Failed to render config: {}", e))
                })?;
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("⚙️  Configuration ({})\n", path.display());
                println!("{}", rendered);
            }
            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let path = config_path.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("✅ Configuration reset: {}", path.display());
            }
        },
    }

    Ok(())
}
