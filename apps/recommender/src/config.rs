use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Credential variables in lookup order. The second is the older frontend-style name.
pub const GEMINI_API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "VITE_GEMINI_API_KEY"];

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Application configuration loaded from environment variables.
/// Everything has a default; only malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub job_mapping_path: PathBuf,
    pub top_n: usize,
    pub llm_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: first_env(&GEMINI_API_KEY_VARS),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            model_path: optional_env("MODEL_PATH")
                .unwrap_or_else(|| "model/classifier.safetensors".to_string())
                .into(),
            vectorizer_path: optional_env("VECTORIZER_PATH")
                .unwrap_or_else(|| "model/vectorizer.json".to_string())
                .into(),
            job_mapping_path: optional_env("JOB_MAPPING_PATH")
                .unwrap_or_else(|| "job_titles.json".to_string())
                .into(),
            top_n: parse_env("TOP_N", 3).context("TOP_N must be a non-negative integer")?,
            llm_timeout: Duration::from_secs(
                parse_env("LLM_TIMEOUT_SECS", 120)
                    .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            ),
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The first of `keys` that is set and non-blank.
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| optional_env(key))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        None => Ok(default),
    }
}
