//! Crate-level error types
//!
//! Backend call failures live in [`crate::llm::BackendError`]; this module
//! holds the configuration error used by config loading and validation.
//! Orchestration boundaries use `anyhow::Result` and wrap these with
//! context.

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
