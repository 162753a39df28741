//! Error types for cleanup runs.

use regcull_registry::RegistryError;
use thiserror::Error;

/// Result type alias using [`CleanupError`] as the error type.
pub type Result<T> = std::result::Result<T, CleanupError>;

/// Errors that abort a whole cleanup run.
///
/// Failures scoped to one repository or one deletion never surface here;
/// they are recorded in the run report instead.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The repository list could not be fetched, so there is nothing to do.
    #[error("Failed to list repositories: {0}")]
    ListRepositories(#[source] RegistryError),

    /// The run configuration is invalid.
    #[error(transparent)]
    InvalidConfig(#[from] regcull_core::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_list_repositories() {
        let err = CleanupError::ListRepositories(RegistryError::AuthenticationFailed {
            message: "401 Unauthorized".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Failed to list repositories: Authentication failed: 401 Unauthorized"
        );
    }

    #[test]
    fn test_error_display_invalid_config() {
        let err = CleanupError::from(regcull_core::Error::InvalidConfig {
            reason: "bad".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }
}
