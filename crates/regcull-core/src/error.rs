//! Error types for regcull core operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in regcull core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Run configuration failed validation.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },

    /// A tag timestamp could not be parsed.
    #[error("Invalid timestamp '{value}' for tag {tag}: {source}")]
    InvalidTimestamp {
        /// Tag name.
        tag: String,
        /// Raw timestamp value.
        value: String,
        /// Underlying parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// Configuration file could not be read.
    #[error("Failed to read configuration from {path}: {source}")]
    ConfigRead {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration from {path}: {source}")]
    ConfigParse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_config() {
        let err = Error::InvalidConfig {
            reason: "tags_per_page must be between 1 and 100".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: tags_per_page must be between 1 and 100"
        );
    }

    #[test]
    fn test_error_display_invalid_timestamp() {
        let source = chrono::DateTime::parse_from_rfc3339("yesterday").unwrap_err();
        let err = Error::InvalidTimestamp {
            tag: "v1.0.0".to_string(),
            value: "yesterday".to_string(),
            source,
        };
        assert!(err
            .to_string()
            .starts_with("Invalid timestamp 'yesterday' for tag v1.0.0"));
    }
}
