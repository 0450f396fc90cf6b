use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Name of the exclusion file written by `find-missing` and read by `run`.
pub const EXCLUSION_FILE_NAME: &str = "processed_emails_latest.txt";

const DEFAULT_OUTPUT_DIR: &str = "prompt_test_results";
const DEFAULT_CALL_INTERVAL_MS: u64 = 1000;

/// Evaluator configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Only the `run` command needs it; see `Config::openai_api_key`.
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub output_dir: PathBuf,
    /// `EXCLUDE_FILE`; falls back to the well-known file in `output_dir`.
    pub exclude_file: Option<PathBuf>,
    pub call_interval: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let call_interval_ms = match std::env::var("SCORING_CALL_INTERVAL_MS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("SCORING_CALL_INTERVAL_MS must be a whole number of milliseconds")?,
            Err(_) => DEFAULT_CALL_INTERVAL_MS,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL").ok(),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            exclude_file: std::env::var("EXCLUDE_FILE").ok().map(PathBuf::from),
            call_interval: Duration::from_millis(call_interval_ms),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("Required environment variable 'OPENAI_API_KEY' is not set")
    }

    /// Exclusion file read by `run`: `EXCLUDE_FILE` if set, otherwise the
    /// well-known file inside the output directory.
    pub fn exclusion_file(&self) -> PathBuf {
        self.exclude_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join(EXCLUSION_FILE_NAME))
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
