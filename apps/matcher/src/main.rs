use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use matcher::config::Config;
use matcher::errors::AppError;
use matcher::matching::MatchEngine;
use matcher::models::match_result::MatchResult;
use matcher::models::RunRequest;

#[derive(Parser)]
#[command(name = "matcher", version, about = "Score and rank CVs against a job description")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every candidate in an input file and print the ranked run as JSON.
    Run {
        /// JSON file: {"job": {...}, "candidates": [{...}, ...]}
        input: PathBuf,
        /// Only print the first N ranked results (1..=50).
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        pretty: bool,
    },
}

/// What the CLI prints for a run.
#[derive(Serialize)]
struct RunOutput<'a> {
    run_id: Uuid,
    job_title: &'a str,
    created_at: DateTime<Utc>,
    scorer_backend: &'a str,
    results: &'a [MatchResult],
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries only the JSON result.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Run { input, top, pretty } => {
            if let Err(e) = run(&config, &input, top, pretty).await {
                let body = serde_json::json!({
                    "error": { "code": e.code(), "message": e.to_string() }
                });
                eprintln!("{body}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run(
    config: &Config,
    input: &Path,
    top: Option<usize>,
    pretty: bool,
) -> Result<(), AppError> {
    let body = tokio::fs::read_to_string(input).await?;
    let request = RunRequest::from_json(&body)?;
    info!(
        input = %input.display(),
        candidates = request.candidates.len(),
        "Loaded run input"
    );

    let engine = MatchEngine::from_config(config);
    let run = engine.run(&request.job, &request.candidates).await;

    let results = match top {
        Some(n) => run.top(n),
        None => run.results.as_slice(),
    };
    let output = RunOutput {
        run_id: run.run_id,
        job_title: &run.job_title,
        created_at: run.created_at,
        scorer_backend: &run.scorer_backend,
        results,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}
