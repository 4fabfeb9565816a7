use anyhow::{anyhow, Result};
use std::env;

/// Application configuration module
/// This module handles the application configuration including loading
/// settings from the environment (a `.env` file is honored when present)
/// and validating them before the pipeline starts.

/// Default OpenRouter endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model used for both the translator and reviewer roles
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Default BibleGateway passage lookup URL
pub const DEFAULT_BIBLEGATEWAY_URL: &str = "https://www.biblegateway.com/passage/";

/// Default Chinese Bible version code
pub const DEFAULT_BIBLE_VERSION: &str = "CCB";

/// Represents the application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter API key (may be empty; validated before use)
    pub api_key: String,

    /// OpenRouter-compatible API base URL
    pub base_url: String,

    /// Model identifier for the translation role
    pub model: String,

    /// Model identifier for the review role
    pub review_model: String,

    /// Sampling temperature for translation requests
    pub translation_temperature: f32,

    /// Sampling temperature for review requests
    pub review_temperature: f32,

    /// Chinese Bible version code used for verse lookups
    pub bible_version: String,

    /// BibleGateway passage URL
    pub biblegateway_url: String,

    /// Maximum estimated tokens per translation chunk
    pub max_tokens_per_chunk: usize,

    /// Maximum paragraphs per translation chunk
    pub max_paragraphs_per_chunk: usize,

    /// Maximum review-and-correct rounds
    pub max_review_iterations: usize,

    /// Font for Latin text in the output document
    pub latin_font: String,

    /// Font for East Asian text in the output document
    pub east_asian_font: String,

    /// Font size in points for the output document
    pub font_size_pt: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            review_model: DEFAULT_MODEL.to_string(),
            translation_temperature: 0.3,
            review_temperature: 0.2,
            bible_version: DEFAULT_BIBLE_VERSION.to_string(),
            biblegateway_url: DEFAULT_BIBLEGATEWAY_URL.to_string(),
            max_tokens_per_chunk: 2000,
            max_paragraphs_per_chunk: 10,
            max_review_iterations: 2,
            latin_font: "Microsoft YaHei".to_string(),
            east_asian_font: "Microsoft YaHei".to_string(),
            font_size_pt: 14,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            api_key: env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            base_url: get_env_string("OPENROUTER_BASE_URL", &defaults.base_url),
            model: get_env_string("DEFAULT_MODEL", &defaults.model),
            review_model: get_env_string("REVIEW_MODEL", &defaults.review_model),
            translation_temperature: get_env_float(
                "TRANSLATION_TEMPERATURE",
                defaults.translation_temperature,
            ),
            review_temperature: get_env_float("REVIEW_TEMPERATURE", defaults.review_temperature),
            bible_version: get_env_string("DEFAULT_BIBLE_VERSION", &defaults.bible_version),
            biblegateway_url: get_env_string("BIBLEGATEWAY_URL", &defaults.biblegateway_url),
            max_tokens_per_chunk: get_env_int("MAX_TOKENS_PER_CHUNK", defaults.max_tokens_per_chunk),
            max_paragraphs_per_chunk: get_env_int(
                "MAX_PARAGRAPHS_PER_CHUNK",
                defaults.max_paragraphs_per_chunk,
            ),
            max_review_iterations: get_env_int(
                "MAX_REVIEW_ITERATIONS",
                defaults.max_review_iterations,
            ),
            latin_font: get_env_string("LATIN_FONT", &defaults.latin_font),
            east_asian_font: get_env_string("EAST_ASIAN_FONT", &defaults.east_asian_font),
            font_size_pt: get_env_int("FONT_SIZE_PT", defaults.font_size_pt as usize) as u32,
        }
    }

    /// Validate the configuration before running the pipeline
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "OpenRouter API key required. Set OPENROUTER_API_KEY or use --api-key"
            ));
        }

        if self.max_paragraphs_per_chunk == 0 {
            return Err(anyhow!("MAX_PARAGRAPHS_PER_CHUNK must be at least 1"));
        }

        if self.max_tokens_per_chunk == 0 {
            return Err(anyhow!("MAX_TOKENS_PER_CHUNK must be at least 1"));
        }

        if self.max_review_iterations == 0 {
            return Err(anyhow!("MAX_REVIEW_ITERATIONS must be at least 1"));
        }

        Ok(())
    }
}

/// Get a string value from the environment, or the default if unset
fn get_env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a float value from the environment, or the default if unset or invalid
fn get_env_float(key: &str, default: f32) -> f32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get an integer value from the environment, or the default if unset or invalid
fn get_env_int(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
