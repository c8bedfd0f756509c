//! Error types for kmlstream.
//!
//! The conversion state machine itself never fails: malformed KML degrades to
//! dropped values or `null` geometries. Errors only come from the layers around
//! it: the XML tokenizer, I/O, JSON output and configuration loading.

use std::io;
use thiserror::Error;

/// Result type alias using KmlError as the error type.
pub type Result<T> = std::result::Result<T, KmlError>;

/// Top-level error type for all kmlstream operations.
#[derive(Debug, Error)]
pub enum KmlError {
    /// The XML tokenizer rejected the input. Fatal for the whole conversion.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Feature serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input was not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Errors related to configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Creates a FileNotFound error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Creates an InvalidValue error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helpers() {
        let err = ConfigError::file_not_found("/etc/kmlstream/config.yaml");
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let err = ConfigError::invalid_value("logging.level", "unknown level");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: KmlError = io_err.into();
        assert!(matches!(err, KmlError::Io(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: KmlError = ConfigError::invalid_format("bad yaml").into();
        assert!(matches!(err, KmlError::Config(ConfigError::InvalidFormat { .. })));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
