use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use triage_engine::CallerSettings;
use url::Url;

/// Console settings read from a RON file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Root of the analysis web service, e.g. `"https://fame.example.org"`.
    pub base_url: String,
    /// Page to keep live, relative to `base_url`.
    pub refresh_path: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_region_selector")]
    pub region_selector: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_interval_ms() -> u64 {
    5_000
}

fn default_region_selector() -> String {
    ".auto-refresh".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConsoleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: ConsoleConfig = ron::from_str(text)?;
        Url::parse(&config.base_url)
            .with_context(|| format!("invalid base_url {:?}", config.base_url))?;
        if config.interval_ms == 0 {
            bail!("interval_ms must be at least 1");
        }
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn caller_settings(&self) -> Result<CallerSettings> {
        let base_url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        Ok(CallerSettings {
            base_url: Some(base_url),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..CallerSettings::default()
        })
    }
}
