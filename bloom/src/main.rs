//! Bloom CLI entry point

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use agronomy::{ReferenceData, StaticClimate};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use bloom::cli::{Cli, Command, OutputFormat};
use bloom::{Advisor, Config, FieldInputs, Generator, ModuleKind, PromptLoader, Recommendation, Report, create_client};

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bloom")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("bloom.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

/// Composition root: the only place that reads the API key
fn build_advisor(config: &Config) -> Result<Advisor> {
    let resolved = config.llm.resolve()?;
    let llm = create_client(&resolved).context("Failed to create LLM client")?;
    let prompts = Arc::new(PromptLoader::new(config.prompts.dir.as_deref()));
    let data = ReferenceData::load(&config.data.dir).context("Failed to load reference data")?;
    let generator = Generator::new(llm, prompts, config.llm.max_tokens);

    Ok(Advisor::from_reference(
        &data,
        Arc::new(StaticClimate),
        generator,
        config.concurrency.max_parallel_calls,
    ))
}

fn print_recommendation(title: &str, rec: &Recommendation, with_reasoning: bool) {
    println!("{}", title.bold().green());
    if with_reasoning && rec.has_reasoning() {
        println!("{}", rec.reasoning.dimmed());
        println!();
    }
    println!("{}", rec.conclusion);
    println!();
}

fn print_report(report: &Report, full: bool) {
    if full {
        for section in &report.sections {
            print_recommendation(section.module.title(), &section.recommendation, true);
        }
    }
    print_recommendation(ModuleKind::Synthesis.title(), &report.synthesis, false);
}

async fn cmd_recommend(config: &Config, field: &Path, full: bool, format: OutputFormat) -> Result<()> {
    debug!(field = %field.display(), full, ?format, "cmd_recommend: called");
    let inputs = FieldInputs::load(field)?;
    let advisor = build_advisor(config)?;
    let report = advisor.advise(&inputs).await?;

    match format {
        OutputFormat::Text => print_report(&report, full),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

async fn cmd_module(config: &Config, kind: ModuleKind, field: &Path) -> Result<()> {
    debug!(%kind, field = %field.display(), "cmd_module: called");
    let inputs = FieldInputs::load(field)?;
    let advisor = build_advisor(config)?;
    let rec = advisor.run_module(kind, &inputs).await?;
    print_recommendation(kind.title(), &rec, true);
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", serde_yaml::to_string(config).context("Failed to serialize config")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(data) = cli.data {
        config.data.dir = data;
    }
    info!("Bloom loaded config: provider={} model={}", config.llm.provider, config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Recommend { field, full, format } => cmd_recommend(&config, &field, full, format).await,
        Command::Module { name, field } => cmd_module(&config, name, &field).await,
        Command::Config => cmd_config(&config),
    }
}
