/// Configuration for the analyzer, loaded from TOML or the environment

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalysisError, Result};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";
pub const MODEL_ENV: &str = "ECHO_MODEL";
pub const BASE_URL_ENV: &str = "ECHO_API_BASE_URL";
pub const MAX_INPUT_CHARS_ENV: &str = "ECHO_MAX_INPUT_CHARS";
pub const LOG_FORMAT_ENV: &str = "ECHO_LOG_FORMAT";

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub max_input_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Build a configuration from environment variables, falling back to
    /// defaults for everything except the API key.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = AppConfig::default();
        if let Some(key) = get(API_KEY_ENV).or_else(|| get(LEGACY_API_KEY_ENV)) {
            config.gemini.api_key = key;
        }
        if let Some(model) = get(MODEL_ENV) {
            config.gemini.model = model;
        }
        if let Some(base_url) = get(BASE_URL_ENV) {
            config.gemini.base_url = base_url;
        }
        if let Some(raw) = get(MAX_INPUT_CHARS_ENV) {
            config.analysis.max_input_chars = parse_limit(MAX_INPUT_CHARS_ENV, &raw)
                .map_err(|e| AnalysisError::InvalidConfig(format!("{:#}", e)))?;
        }
        if let Some(format) = get(LOG_FORMAT_ENV) {
            config.logging.format = match format.as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(AnalysisError::InvalidConfig(format!(
                        "{}={:?} (expected json or pretty)",
                        LOG_FORMAT_ENV, other
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(format!(
                "missing API key (set gemini.api_key or {})",
                API_KEY_ENV
            )));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig("model must not be empty".to_string()));
        }
        if self.gemini.base_url.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig("base_url must not be empty".to_string()));
        }
        if self.analysis.max_input_chars == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_input_chars must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_limit(name: &str, raw: &str) -> anyhow::Result<usize> {
    let value = raw
        .parse::<usize>()
        .with_context(|| format!("invalid {}={:?}", name, raw))?;
    if value == 0 {
        return Err(anyhow!("{} must be positive", name));
    }
    Ok(value)
}
