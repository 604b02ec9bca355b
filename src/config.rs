//! Configuration management for Nexus
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file with serde defaults, plus per-turn model
//! configuration that CLI flags and interactive commands may override.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{NexusError, Result};

/// Main configuration structure for Nexus
///
/// Every field has a serde default, so a missing or partial config file
/// yields a fully usable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Default per-turn generation settings
    #[serde(default)]
    pub generation: ModelConfig,

    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Gemini endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL for the Gemini API
    ///
    /// Overridable so tests can point the provider at a mock server.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// HTTP client timeout in seconds
    ///
    /// A timeout is one more provider failure path; it surfaces as an
    /// error-flagged message like any other network fault.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Per-turn model configuration
///
/// These are the capability knobs applied to every request: model selection,
/// sampling temperature, search grounding, and the thinking budget. The
/// thinking budget is only sent when `use_thinking` is true AND the budget
/// is positive.
///
/// # Examples
///
/// ```
/// use nexus::config::ModelConfig;
///
/// let config = ModelConfig::default();
/// assert_eq!(config.model_name, "gemini-2.5-flash");
/// assert!(!config.use_search);
/// assert_eq!(config.thinking_budget, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier, sent verbatim; no automatic substitution occurs
    /// when attachments are present, so pick a vision-capable model when
    /// sending images
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Sampling temperature in `[0.0, 1.0]`
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Enable provider-side web search grounding
    #[serde(default)]
    pub use_search: bool,

    /// Enable extended thinking
    #[serde(default)]
    pub use_thinking: bool,

    /// Token allowance for internal reasoning; only sent when
    /// `use_thinking` is true and the budget is positive
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,

    /// Optional cap on output tokens
    ///
    /// Left unset by default: when thinking is enabled the provider then
    /// allocates the remaining context to reasoning output. Set a value to
    /// opt out of that policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

fn default_model_name() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_thinking_budget() -> u32 {
    1024
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            temperature: default_temperature(),
            use_search: false,
            use_thinking: false,
            thinking_budget: default_thinking_budget(),
            max_output_tokens: None,
        }
    }
}

impl ModelConfig {
    /// Validates the per-turn settings
    ///
    /// # Errors
    ///
    /// Returns `NexusError::Config` for an empty model name or a
    /// temperature outside `[0.0, 1.0]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::config::ModelConfig;
    ///
    /// let mut config = ModelConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.temperature = 1.5;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(NexusError::Config("model_name must not be empty".to_string()).into());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(NexusError::Config(format!(
                "temperature must be within [0.0, 1.0], got {}",
                self.temperature
            ))
            .into());
        }
        Ok(())
    }
}

/// Interactive chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Size ceiling for a single attachment, in bytes
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,

    /// Print the per-turn token usage line after each reply
    #[serde(default = "default_show_usage")]
    pub show_usage: bool,
}

fn default_max_attachment_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_show_usage() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_attachment_bytes: default_max_attachment_bytes(),
            show_usage: default_show_usage(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// locations are tried in order (`./config/config.yaml`, then the
    /// platform config dir) and missing files fall through to defaults.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional explicit config file path
    ///
    /// # Errors
    ///
    /// Returns an error when an explicit path does not exist, or when any
    /// found file fails to parse.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_file(Path::new(path));
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                return Self::load_file(&candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|e| {
            NexusError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Candidate config file locations, most specific first
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config/config.yaml")];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "nexus") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }
        paths
    }

    /// Validates the full configuration
    ///
    /// Intended to run once at startup, before any request is built, so
    /// invalid values never reach the request builder.
    ///
    /// # Errors
    ///
    /// Returns `NexusError::Config` on an unparseable `api_base`, a zero
    /// timeout, a zero attachment ceiling, or invalid generation settings.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.provider.api_base).map_err(|e| {
            NexusError::Config(format!(
                "api_base {:?} is not a valid URL: {}",
                self.provider.api_base, e
            ))
        })?;
        if self.provider.timeout_seconds == 0 {
            return Err(NexusError::Config("timeout_seconds must be positive".to_string()).into());
        }
        if self.chat.max_attachment_bytes == 0 {
            return Err(
                NexusError::Config("max_attachment_bytes must be positive".to_string()).into(),
            );
        }
        self.generation.validate()
    }
}
