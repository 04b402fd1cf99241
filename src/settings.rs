use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// Value used when no API key is configured. Requests go out unauthenticated.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://apitcg.com/api/one-piece/cards";
pub const DEFAULT_OUTPUT: &str = "cards_database.json";
pub const DEFAULT_RATE_LIMIT_MS: u64 = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_key: String,
    pub api_base: String,
    pub output: PathBuf,
    pub rate_limit_ms: u64,
}

impl Settings {
    /// Defaults overlaid with `OPTCG_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::from_builder(Config::builder().add_source(Environment::with_prefix("OPTCG")))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .set_default("api_key", PLACEHOLDER_API_KEY)?
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("rate_limit_ms", DEFAULT_RATE_LIMIT_MS as i64)?
            .build()
            .context("Failed to read OPTCG_* settings")?
            .try_deserialize()
            .context("Invalid OPTCG_* settings")
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != PLACEHOLDER_API_KEY
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}
