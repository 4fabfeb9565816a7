// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app_config::Config;
use crate::providers::openrouter::OpenRouter;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod document_processor;
mod errors;
mod providers;
mod translation;
mod verse_fetcher;

/// doctran - AI-powered DOCX translation
///
/// Translates Word documents to Chinese using OpenRouter chat models,
/// preserving paragraph structure and inline formatting.
#[derive(Parser, Debug)]
#[command(name = "doctran")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered DOCX translation tool")]
#[command(long_about = "doctran translates Word documents using AI chat models while preserving
paragraph structure and bold/italic formatting.

EXAMPLES:
    doctran sermon.docx                          # Translate using default models
    doctran -o out.docx sermon.docx              # Write to a specific output file
    doctran --model openai/gpt-4o sermon.docx    # Use a specific translation model
    doctran --skip-review sermon.docx            # Translate without the review pass
    doctran --bible-version NIV sermon.docx      # Use a different Bible version

CONFIGURATION:
    Settings come from environment variables (a .env file is loaded if
    present). OPENROUTER_API_KEY is required; see the README for the full
    list of supported variables.")]
struct CommandLineOptions {
    /// Input DOCX file to translate
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Output file path (default: <input>-ChineseTranslation.docx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Model to use for review
    #[arg(long)]
    review_model: Option<String>,

    /// Bible version for verse lookups (e.g. CCB, NIV)
    #[arg(long)]
    bible_version: Option<String>,

    /// Skip the review pass
    #[arg(long)]
    skip_review: bool,

    /// Set logging level
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load a .env file if present, before reading any configuration
    let _ = dotenvy::dotenv();

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    CustomLogger::init(cli.log_level.unwrap_or(LevelFilter::Info))?;

    // Build configuration from the environment, then apply CLI overrides
    let mut config = Config::from_env();

    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(review_model) = cli.review_model {
        config.review_model = review_model;
    }
    if let Some(bible_version) = cli.bible_version {
        config.bible_version = bible_version;
    }

    config.validate()?;

    // Input must exist and be a .docx file
    if !cli.input_file.is_file() {
        return Err(anyhow!(
            "Input file does not exist: {}",
            cli.input_file.display()
        ));
    }

    let is_docx = cli
        .input_file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
    if !is_docx {
        return Err(anyhow!(
            "Input file must be a .docx document: {}",
            cli.input_file.display()
        ));
    }

    // Verify the provider is reachable before touching the document
    let provider = Arc::new(OpenRouter::new(&config.api_key, &config.base_url));
    info!("Checking connection to {}...", config.base_url);
    provider
        .test_connection(&config.model)
        .await
        .context("Failed to connect to the OpenRouter API")?;

    let controller = Controller::with_provider(config, provider);
    controller
        .run(&cli.input_file, cli.output, cli.skip_review)
        .await?;

    Ok(())
}
