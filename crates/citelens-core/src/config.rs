//! Citelens Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for local runs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Extraction engine configuration
    pub extraction: ExtractionConfig,

    /// Batch runner configuration
    pub batch: BatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Extraction
        if let Ok(path) = std::env::var("CITELENS_LEXICON_PATH") {
            if !path.trim().is_empty() {
                config.extraction.lexicon_path = Some(PathBuf::from(path));
            }
        }

        // Batch
        if let Ok(value) = std::env::var("CITELENS_BATCH_CONCURRENCY") {
            config.batch.concurrency = parse_concurrency("CITELENS_BATCH_CONCURRENCY", &value)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        if env_config.extraction.lexicon_path.is_some() {
            self.extraction.lexicon_path = env_config.extraction.lexicon_path;
        }
        if env_config.batch.concurrency != BatchConfig::default().concurrency {
            self.batch.concurrency = env_config.batch.concurrency;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        Ok(self)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.concurrency".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_concurrency(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Extraction engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Custom lexicon TOML file; the builtin lexicon is used when unset
    pub lexicon_path: Option<PathBuf>,
}

/// Batch runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of responses analyzed concurrently
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
