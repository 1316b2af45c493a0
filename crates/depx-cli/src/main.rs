//! depx CLI - Command-line interface
//!
//! Usage:
//!   depx extract <path> [--format json|conllu] [--json]
//!   depx stats [TEXT] [--file <path>]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use depx_core::{AppConfig, LoggingConfig, Triple};
use depx_extractor::TripleExtractor;
use depx_parser::{InputFormat, ParserRegistry, TextStats};

#[derive(Parser)]
#[command(name = "depx")]
#[command(about = "Subject-relation-object triples from dependency-parsed text")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one triple per sentence from parser output
    Extract {
        /// Path to a JSON or CoNLL-U file
        path: PathBuf,

        /// Input format, detected from the extension when omitted
        #[arg(long)]
        format: Option<InputFormat>,

        /// Print one JSON object per sentence
        #[arg(long)]
        json: bool,
    },
    /// Count words and characters
    Stats {
        /// Text to analyze
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TripleLine<'a> {
    #[serde(flatten)]
    triple: &'a Triple,
    matched: bool,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

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

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    Ok(config.with_env_override()?)
}

/// `--format` wins over `input.format`; `None` means detect from the extension
fn resolve_format(
    flag: Option<InputFormat>,
    config: &AppConfig,
) -> anyhow::Result<Option<InputFormat>> {
    match flag {
        Some(format) => Ok(Some(format)),
        None => Ok(config
            .input
            .format
            .as_deref()
            .map(str::parse::<InputFormat>)
            .transpose()?),
    }
}

fn run_extract(
    config: &AppConfig,
    path: PathBuf,
    format: Option<InputFormat>,
    json: bool,
) -> anyhow::Result<()> {
    let format = resolve_format(format, config)?;

    let registry = ParserRegistry::with_defaults();
    let doc = registry
        .parse(&path, format)
        .with_context(|| format!("loading {}", path.display()))?;
    let stats = doc.stats();
    tracing::info!(
        path = %path.display(),
        sentences = doc.sentences.len(),
        tokens = doc.token_count(),
        words = stats.word_count,
        chars = stats.char_count,
        "Extracting triples"
    );

    let extractor = TripleExtractor::new();
    let fallback = config.extraction.unknown_relation.as_str();

    for extraction in extractor.extract_all(&doc.sentences) {
        let matched = match &extraction.relation {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Using fallback relation");
                false
            }
        };
        let triple = extraction.into_triple_or(fallback);

        if json {
            println!(
                "{}",
                serde_json::to_string(&TripleLine {
                    triple: &triple,
                    matched
                })?
            );
        } else {
            println!("{triple}");
        }
    }

    Ok(())
}

fn run_stats(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<()> {
    let text = match (text, file) {
        (_, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        (Some(text), None) => text,
        (None, None) => String::new(),
    };

    let stats = TextStats::from_text(&text);
    if stats.is_empty() {
        tracing::warn!("No text to analyze");
        eprintln!("Please enter some text to analyze.");
        return Ok(());
    }

    println!("Word Count: {}", stats.word_count);
    println!("Character Count (including spaces): {}", stats.char_count);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Extract { path, format, json } => run_extract(&config, path, format, json)?,
        Commands::Stats { text, file } => run_stats(text, file)?,
    }

    Ok(())
}
