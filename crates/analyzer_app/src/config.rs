//! RON configuration for the analyzer binary.
//!
//! Every field has a default, so a partial file (or no file at all) works.

use std::fs;
use std::path::Path;
use std::time::Duration;

use analyzer_engine::{FetchSettings, GeminiSettings, PipelineSettings, DEFAULT_CONTENT_TIMEOUT};
use analyzer_logging::analyzer_info;
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::KindArg;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: String,
    pub api_base_url: String,
    pub content_timeout_ms: u64,
    pub model_timeout_secs: u64,
    pub default_kind: KindArg,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let gemini = GeminiSettings::new("");
        Self {
            model: gemini.model,
            api_base_url: gemini.base_url,
            content_timeout_ms: DEFAULT_CONTENT_TIMEOUT.as_millis() as u64,
            model_timeout_secs: gemini.request_timeout.as_secs(),
            default_kind: KindArg::Conflict,
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            redirect_limit: settings.redirect_limit,
            max_bytes: settings.max_bytes,
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                analyzer_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };

        let config: Self =
            ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        analyzer_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn gemini_settings(&self, api_key: String) -> GeminiSettings {
        GeminiSettings {
            base_url: self.api_base_url.clone(),
            model: self.model.clone(),
            api_key,
            request_timeout: Duration::from_secs(self.model_timeout_secs),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            ..FetchSettings::default()
        }
    }

    /// `timeout_ms` from the command line wins over the file.
    pub fn pipeline_settings(&self, timeout_ms: Option<u64>) -> PipelineSettings {
        let millis = timeout_ms.unwrap_or(self.content_timeout_ms);
        PipelineSettings {
            content_timeout: Duration::from_millis(millis),
            ..PipelineSettings::default()
        }
    }
}
