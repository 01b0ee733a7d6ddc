//! Citelens CLI - Command-line interface
//!
//! Usage:
//!   citelens extract --brand <name> [--competitor <name>]... [--url <url>]... [--text <text> | --file <path>]
//!   citelens sentiment <text>
//!   citelens compare --brand <name> --competitor <name> <text>
//!   citelens batch <jobs.jsonl>
//!   citelens evaluate <gold.jsonl>

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use citelens_core::{AppConfig, CompetitiveContext, Entity, LoggingConfig, ProjectExtraction};
use citelens_extractor::batch::parse_jobs_jsonl;
use citelens_extractor::metrics::{evaluate_sentiment, parse_gold_jsonl};
use citelens_extractor::{BatchRunner, ExtractionOrchestrator, ExtractionSummary, SentimentScore};

#[derive(Parser)]
#[command(name = "citelens")]
#[command(about = "Brand and competitor citation extraction for AI-generated answers")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML); environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract brand and competitor citations from a response
    Extract {
        /// Brand name
        #[arg(long)]
        brand: String,
        /// Competitor name (repeatable)
        #[arg(long = "competitor")]
        competitors: Vec<String>,
        /// Source URL returned with the response (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,
        /// Response text; read from stdin when neither --text nor --file is given
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// File containing the response text
        #[arg(long)]
        file: Option<PathBuf>,
        /// Include an aggregated summary
        #[arg(long)]
        summary: bool,
    },
    /// Classify the sentiment of a sentence
    Sentiment {
        text: String,
        /// Print the lexicon scores as well
        #[arg(long)]
        explain: bool,
    },
    /// Classify competitive framing in a sentence
    Compare {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        competitor: String,
        text: String,
    },
    /// Run extraction over a JSON Lines file of stored responses
    Batch {
        input: PathBuf,
        /// Override the configured concurrency
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Evaluate sentiment scoring against a labelled JSON Lines file
    Evaluate { gold: PathBuf },
}

#[derive(Serialize)]
struct ExtractOutput {
    extraction: ProjectExtraction,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ExtractionSummary>,
}

#[derive(Serialize)]
struct SentimentOutput<'a> {
    text: &'a str,
    sentiment: citelens_core::Sentiment,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<SentimentScore>,
}

#[derive(Serialize)]
struct CompareOutput {
    compared_with_brand: bool,
    competitive_context: CompetitiveContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    init_tracing(&config.logging);
    tracing::debug!(
        "Configuration loaded: batch concurrency {}, custom lexicon {}",
        config.batch.concurrency,
        config.extraction.lexicon_path.is_some()
    );

    match cli.command {
        Commands::Extract {
            brand,
            competitors,
            urls,
            text,
            file,
            summary,
        } => {
            let text = read_response(text, file)?;
            let engine = ExtractionOrchestrator::from_config(&config.extraction)?;
            let competitors: Vec<Entity> =
                competitors.into_iter().map(Entity::competitor).collect();

            let extraction =
                engine.extract_project(&text, &Entity::brand(brand), &competitors, &urls)?;
            let summary = summary.then(|| ExtractionSummary::from_extraction(&extraction));

            print_json(&ExtractOutput {
                extraction,
                summary,
            })?;
        }
        Commands::Sentiment { text, explain } => {
            let engine = ExtractionOrchestrator::from_config(&config.extraction)?;
            print_json(&SentimentOutput {
                text: &text,
                sentiment: engine.analyze_sentiment(&text),
                score: explain.then(|| engine.sentiment_score(&text)),
            })?;
        }
        Commands::Compare {
            brand,
            competitor,
            text,
        } => {
            let engine = ExtractionOrchestrator::from_config(&config.extraction)?;
            print_json(&CompareOutput {
                compared_with_brand: engine.check_if_compared_with_brand(&text, &brand),
                competitive_context: engine.classify_competitive_context(
                    &text,
                    &brand,
                    &competitor,
                ),
            })?;
        }
        Commands::Batch { input, concurrency } => {
            if let Some(concurrency) = concurrency {
                config.batch.concurrency = concurrency;
            }
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let jobs = parse_jobs_jsonl(&content)?;
            tracing::info!("Loaded {} jobs from {}", jobs.len(), input.display());

            let runner = BatchRunner::from_config(&config)?;
            let report = runner.run(jobs).await;
            print_json(&report)?;
        }
        Commands::Evaluate { gold } => {
            let content = std::fs::read_to_string(&gold)
                .with_context(|| format!("Failed to read {}", gold.display()))?;
            let gold = parse_gold_jsonl(&content)?;
            tracing::info!("Evaluating sentiment on {} labelled sentences", gold.len());

            let engine = ExtractionOrchestrator::from_config(&config.extraction)?;
            let evaluation = evaluate_sentiment(&engine, &gold);
            println!("{}", evaluation.report());
        }
    }

    Ok(())
}

/// Logs go to stderr so JSON output on stdout stays parseable
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_response(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read response from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
