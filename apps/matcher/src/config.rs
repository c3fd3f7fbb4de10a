use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::errors::AppError;

pub const DEFAULT_EMBEDDINGS_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_EMBEDDINGS_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MATCH_CONCURRENCY: usize = 8;

/// Engine configuration loaded from environment variables.
///
/// Nothing is required: with no embedding endpoint configured the engine runs
/// on the exact-match / Jaccard strategy.
#[derive(Debug, Clone)]
pub struct Config {
    /// `AI_EMBEDDINGS` master switch. `false` forces the exact strategy.
    pub ai_embeddings: bool,
    pub embeddings_url: Option<String>,
    pub embeddings_api_key: Option<String>,
    pub embeddings_model: String,
    pub embeddings_timeout_ms: u64,
    pub match_concurrency: usize,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai_embeddings: true,
            embeddings_url: None,
            embeddings_api_key: None,
            embeddings_model: DEFAULT_EMBEDDINGS_MODEL.to_string(),
            embeddings_timeout_ms: DEFAULT_EMBEDDINGS_TIMEOUT_MS,
            match_concurrency: DEFAULT_MATCH_CONCURRENCY,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            ai_embeddings: std::env::var("AI_EMBEDDINGS")
                .map(|v| parse_toggle(&v))
                .unwrap_or(true),
            embeddings_url: optional_env("EMBEDDINGS_URL"),
            embeddings_api_key: optional_env("EMBEDDINGS_API_KEY"),
            embeddings_model: optional_env("EMBEDDINGS_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDINGS_MODEL.to_string()),
            embeddings_timeout_ms: parse_env("EMBEDDINGS_TIMEOUT_MS", DEFAULT_EMBEDDINGS_TIMEOUT_MS)?,
            match_concurrency: parse_env("MATCH_CONCURRENCY", DEFAULT_MATCH_CONCURRENCY)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.match_concurrency == 0 {
            return Err(AppError::Config(
                "MATCH_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        if self.embeddings_timeout_ms == 0 {
            return Err(AppError::Config(
                "EMBEDDINGS_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// True when the semantic strategy should be attempted.
    pub fn embeddings_enabled(&self) -> bool {
        self.ai_embeddings && self.embeddings_url.is_some()
    }

    pub fn embeddings_timeout(&self) -> Duration {
        Duration::from_millis(self.embeddings_timeout_ms)
    }
}

/// `0`, `false` and `off` disable; anything else (including `auto`) enables.
fn parse_toggle(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "0" | "false" | "off")
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
