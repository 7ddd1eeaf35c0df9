use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::summarize::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub model: String,
    pub base_url: String,
    /// Falls back to `GEMINI_API_KEY` when unset
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Config {
    /// Load defaults, then the optional file at `path`, then `SCRIBE_*` env vars
    ///
    /// Nested keys use `__`, e.g. `SCRIBE_SERVICE__HTTP__PORT=4000`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "scribe-live")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 3000)?
            .set_default("summarizer.model", DEFAULT_MODEL)?
            .set_default("summarizer.base_url", DEFAULT_BASE_URL)?
            .set_default("summarizer.timeout_secs", 60)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SCRIBE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.service.http.bind, self.service.http.port)
    }
}

/// Load `KEY=value` lines from a `.env` file into the process environment
///
/// Variables that are already set are left alone. Returns false when the
/// file does not exist.
pub fn load_dotenv(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}
