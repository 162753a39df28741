//! Error types for registry operations.

use thiserror::Error;

/// Result type alias using [`RegistryError`] as the error type.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to connect to registry.
    #[error("Failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Authentication failed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Error message.
        message: String,
    },

    /// Repository or tag not found in registry.
    #[error("Not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// HTTP error from registry.
    #[error("HTTP error from registry: {status} - {message}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Response body is not the expected JSON.
    #[error("JSON error: {source}")]
    JsonError {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid URL.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// URL string.
        url: String,
    },

    /// Registry returned a payload missing required fields.
    #[error("Malformed registry payload: {message}")]
    MalformedPayload {
        /// Error message.
        message: String,
    },
}

impl RegistryError {
    /// Returns true if the resource vanished between listing and fetching.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else if err.is_decode() {
            Self::MalformedPayload {
                message: err.to_string(),
            }
        } else {
            Self::HttpError {
                status: err.status().map_or(0, |s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError { source: err }
    }
}

impl From<regcull_core::Error> for RegistryError {
    fn from(err: regcull_core::Error) -> Self {
        Self::MalformedPayload {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = RegistryError::NotFound {
            resource: "tag v1.2.0 in repository 7".to_string(),
        };
        assert_eq!(err.to_string(), "Not found: tag v1.2.0 in repository 7");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_display_http() {
        let err = RegistryError::HttpError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error from registry: 500 - boom");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_core_error() {
        let core = regcull_core::Tag::parse("v1", 1, "never").unwrap_err();
        let err = RegistryError::from(core);
        assert!(matches!(err, RegistryError::MalformedPayload { .. }));
        assert!(err.to_string().contains("never"));
    }
}
