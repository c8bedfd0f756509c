//! Configuration for the converter and the `kml2geojson` binary.
//!
//! Every setting has a default that reproduces the legacy converter output, so
//! an empty YAML document is a valid configuration.
//!
//! # Examples
//!
//! ```
//! use kmlstream_core::config::{AppConfig, LogFormat};
//!
//! let config = AppConfig::from_yaml("logging:\n  format: json\n").unwrap();
//! assert_eq!(config.logging.format, LogFormat::Json);
//! assert!(config.converter.cdata_as_text);
//! config.validate().unwrap();
//! ```

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Conversion behaviour
    #[serde(default)]
    pub converter: ConverterOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::invalid_format(e.to_string()).into())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.converter.validate()?;
        self.logging.parse_level()?;
        Ok(())
    }
}

/// Options for the tokenizer adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterOptions {
    /// Deliver CDATA sections to the state machine as text
    #[serde(default = "default_true")]
    pub cdata_as_text: bool,

    /// Initial size of the XML read buffer, in bytes
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_buffer_capacity() -> usize {
    8192
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            cdata_as_text: true,
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

impl ConverterOptions {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(ConfigError::invalid_value(
                "converter.buffer_capacity",
                "must be greater than zero",
            )
            .into());
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG` when set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level.parse().map_err(|_| {
            ConfigError::invalid_value("logging.level", format!("Invalid log level: {}", self.level))
                .into()
        })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}', expected text or json")),
        }
    }
}

/// Output formatting for the FeatureCollection envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print each feature
    #[serde(default)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KmlError;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::new();
        assert!(config.validate().is_ok());
        assert!(config.converter.cdata_as_text);
        assert_eq!(config.converter.buffer_capacity, 8192);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_empty_yaml() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
converter:
  cdata_as_text: false
output:
  pretty: true
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(!config.converter.cdata_as_text);
        assert_eq!(config.converter.buffer_capacity, 8192);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = AppConfig::from_yaml("converter: [1, 2").unwrap_err();
        assert!(matches!(err, KmlError::Config(ConfigError::InvalidFormat { .. })));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = AppConfig::new();
        config.converter.buffer_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::new();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file("/nonexistent/kmlstream.yaml").unwrap_err();
        assert!(matches!(err, KmlError::Config(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
