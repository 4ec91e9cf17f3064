use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::warn;

use crate::gateways::{DEFAULT_GEMINI_MODEL, DEFAULT_SEARCH_RESULTS};

pub const DEFAULT_REFERENCE_DATA_PATH: &str = "data/reference_choices.csv";
pub const DEFAULT_PORT: u16 = 3000;

/// Service configuration, read once at startup from the environment.
/// `main` loads `.env` before calling [`Config::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub search_result_count: usize,
    pub reference_data_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            serpapi_key: secret("SERPAPI_KEY"),
            gemini_api_key: secret("GEMINI_API_KEY"),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            search_result_count: parse_or("SEARCH_RESULT_COUNT", DEFAULT_SEARCH_RESULTS)?,
            reference_data_path: std::env::var("REFERENCE_DATA_PATH")
                .unwrap_or_else(|_| DEFAULT_REFERENCE_DATA_PATH.to_string())
                .into(),
            port: parse_or("PORT", DEFAULT_PORT)?,
        })
    }
}

/// Missing keys are not fatal: the upstream API rejects the call instead
fn secret(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        warn!(key, "API key not set, requests to this service will fail authentication");
        String::new()
    })
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
