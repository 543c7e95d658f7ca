//! Configuration management
//!
//! Loads, validates, and manages the maestro configuration, stored in TOML
//! format at ~/.maestro/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **llm**: Backend endpoints and model names
//! - **notifier**: Optional webhook URL for task event notifications
//!
//! # Credentials
//!
//! API keys are deliberately not part of the configuration. Backends take
//! the key as a required constructor argument; the CLI sources keys from
//! the `ANTHROPIC_API_KEY` and `OPENAI_API_KEY` environment variables and
//! callers embedding the library may use any secret store they like.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Backend configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Notification settings
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// Core settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmConfig {
    /// Analysis backend (planning, analyze/research steps, synthesis)
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Generation backend (generate steps)
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Anthropic backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// Base URL for the Anthropic API
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_anthropic_model")]
    pub model: String,
    // Note: API key injected at construction, never stored in config
}

/// OpenAI backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL for the OpenAI API
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_openai_model")]
    pub model: String,
    // Note: API key injected at construction, never stored in config
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifierConfig {
    /// Webhook URL for task event delivery; notifications are disabled
    /// when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4-turbo".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: default_anthropic_base_url(),
            model: default_anthropic_model(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            llm: LlmConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating a default
    /// config file if none exists
    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails,
    /// or validation fails.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration and save it to the given path
    fn create_default(path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::default();
        config.validate()?;

        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(path, toml_string)?;

        Ok(config)
    }

    /// Default configuration file path (~/.maestro/config.toml)
    fn default_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::Invalid("Could not determine home directory".to_string()))?;

        Ok(home.join(".maestro").join("config.toml"))
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        for (name, base_url) in [
            ("anthropic", &self.llm.anthropic.base_url),
            ("openai", &self.llm.openai.base_url),
        ] {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "{} base_url must start with http:// or https://",
                    name
                )));
            }
        }

        if let Some(url) = &self.notifier.webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(
                    "notifier webhook_url must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.llm.anthropic.base_url, "https://api.anthropic.com/v1");
        assert_eq!(config.llm.openai.base_url, "https://api.openai.com/v1");
        assert!(config.notifier.webhook_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_path_with_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[core]\nlog_level = \"debug\"\n\n[llm.openai]\nmodel = \"gpt-4o-mini\"\n"
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.core.log_level, "debug");
        assert_eq!(config.llm.openai.model, "gpt-4o-mini");
        // Unspecified sections fall back to defaults
        assert_eq!(config.llm.anthropic.model, "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[core]\nlog_level = \"verbose\"\n").unwrap();

        let result = Config::load_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_webhook_url_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[notifier]\nwebhook_url = \"not-a-url\"\n").unwrap();

        let result = Config::load_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed.core.log_level, config.core.log_level);
        assert_eq!(parsed.llm.anthropic.model, config.llm.anthropic.model);
    }

    #[test]
    fn test_no_credentials_in_config_surface() {
        // The serialized config must never carry key material fields
        let toml_string = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!toml_string.contains("api_key"));
        assert!(!toml_string.contains("sk-"));
    }
}
