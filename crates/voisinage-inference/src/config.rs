//! Analysis configuration.
//!
//! Configuration can be loaded from:
//! - TOML files (default: ~/.config/voisinage/analysis.toml)
//! - Environment variables (VOISINAGE_* prefixed, plus OPENAI_API_KEY and
//!   OPENAI_BASE_URL)
//!
//! # Example
//!
//! ```rust,no_run
//! use voisinage_inference::config::AnalysisConfig;
//!
//! // Load from default path or fall back to env vars
//! let config = AnalysisConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = AnalysisConfig::from_file(std::path::Path::new("analysis.toml"))
//!     .expect("Failed to load");
//! ```
//!
//! A file may reference environment variables as `${VAR_NAME}`:
//!
//! ```toml
//! [vision]
//! model = "gpt-4o-mini"
//! api_key = "${OPENAI_API_KEY}"
//! json_mode = true
//!
//! [retry]
//! max_retries = 5
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use voisinage_core::defaults::{
    ENV_OPENAI_API_KEY, ENV_OPENAI_BASE_URL, IMAGE_JPEG_QUALITY, IMAGE_MAX_DIMENSION,
    VISION_BASE_URL, VISION_MAX_TOKENS, VISION_MODEL, VISION_TEMPERATURE, VISION_TIMEOUT_SECS,
};

use crate::retry::RetryPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid placeholder regex"));

/// Remote vision endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// Bearer credential. Analysis fails with a configuration error without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
    /// Ask the provider for `response_format: json_object`.
    pub json_mode: bool,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            base_url: VISION_BASE_URL.to_string(),
            api_key: None,
            model: VISION_MODEL.to_string(),
            max_tokens: VISION_MAX_TOKENS,
            temperature: VISION_TEMPERATURE,
            timeout_seconds: VISION_TIMEOUT_SECS,
            json_mode: false,
        }
    }
}

impl VisionSettings {
    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "vision base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "vision base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.model.is_empty() {
            return Err(ConfigError::Validation(
                "vision model cannot be empty".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "vision max_tokens must be positive".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "vision temperature must be within [0, 2], got: {}",
                self.temperature
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "vision timeout_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Image preparation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Longest side after downscaling, in pixels.
    pub max_dimension: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            max_dimension: IMAGE_MAX_DIMENSION,
            jpeg_quality: IMAGE_JPEG_QUALITY,
        }
    }
}

impl ImageSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "image max_dimension must be positive".to_string(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation(format!(
                "image jpeg_quality must be within [1, 100], got: {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Main analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub vision: VisionSettings,
    #[serde(default)]
    pub image: ImageSettings,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl AnalysisConfig {
    /// Get the default config file path.
    ///
    /// Returns: $XDG_CONFIG_HOME/voisinage/analysis.toml, or
    /// ~/.config/voisinage/analysis.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"));
        path.push("voisinage");
        path.push("analysis.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!(
                subsystem = "config",
                path = %path.display(),
                "Loading analysis config"
            );
            Self::from_file(&path)
        } else {
            debug!(
                subsystem = "config",
                path = %path.display(),
                "Config file not found, using environment variables"
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing `api_key` falls back to `OPENAI_API_KEY`.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if config.vision.api_key.is_none() {
            config.vision.api_key = non_empty_var(ENV_OPENAI_API_KEY);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content after `${VAR}` substitution, without validation.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let content = Self::substitute_env_vars(content);
        let mut config: Self = toml::from_str(&content)?;
        // An unresolved placeholder is no credential at all.
        if config
            .vision
            .api_key
            .as_deref()
            .is_some_and(|key| key.is_empty() || ENV_PLACEHOLDER.is_match(key))
        {
            config.vision.api_key = None;
        }
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let vision = VisionSettings {
            base_url: non_empty_var("VOISINAGE_VISION_URL")
                .or_else(|| non_empty_var(ENV_OPENAI_BASE_URL))
                .unwrap_or(defaults.vision.base_url),
            api_key: non_empty_var("VOISINAGE_API_KEY")
                .or_else(|| non_empty_var(ENV_OPENAI_API_KEY)),
            model: non_empty_var("VOISINAGE_VISION_MODEL").unwrap_or(defaults.vision.model),
            max_tokens: parsed_var("VOISINAGE_VISION_MAX_TOKENS")
                .unwrap_or(defaults.vision.max_tokens),
            temperature: parsed_var("VOISINAGE_VISION_TEMPERATURE")
                .unwrap_or(defaults.vision.temperature),
            timeout_seconds: parsed_var("VOISINAGE_VISION_TIMEOUT")
                .unwrap_or(defaults.vision.timeout_seconds),
            json_mode: env::var("VOISINAGE_JSON_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.vision.json_mode),
        };

        let image = ImageSettings {
            max_dimension: parsed_var("VOISINAGE_IMAGE_MAX_DIMENSION")
                .unwrap_or(defaults.image.max_dimension),
            jpeg_quality: parsed_var("VOISINAGE_IMAGE_JPEG_QUALITY")
                .unwrap_or(defaults.image.jpeg_quality),
        };

        let retry = RetryPolicy {
            max_retries: parsed_var("VOISINAGE_RETRY_MAX").unwrap_or(defaults.retry.max_retries),
            base_delay_ms: parsed_var("VOISINAGE_RETRY_BASE_DELAY_MS")
                .unwrap_or(defaults.retry.base_delay_ms),
            max_jitter_ms: parsed_var("VOISINAGE_RETRY_MAX_JITTER_MS")
                .unwrap_or(defaults.retry.max_jitter_ms),
        };

        Self {
            vision,
            image,
            retry,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.vision.validate()?;
        self.image.validate()?;
        Ok(())
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
