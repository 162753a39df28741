//! Configuration types for the registry client.

use std::time::Duration;

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// API base URL (e.g., "<https://gitlab.example.com/api/v4>").
    pub url: String,

    /// Project id or full project path owning the registry.
    pub project: String,

    /// Authentication configuration.
    pub auth: RegistryAuth,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl RegistryConfig {
    /// Creates a new registry configuration with the given API base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use regcull_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new("https://gitlab.example.com/api/v4");
    /// assert_eq!(config.url, "https://gitlab.example.com/api/v4");
    /// ```
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            project: String::new(),
            auth: RegistryAuth::None,
            timeout: Duration::from_secs(30),
            user_agent: format!("regcull/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the project id or path.
    ///
    /// # Examples
    ///
    /// ```
    /// use regcull_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new("https://gitlab.example.com/api/v4")
    ///     .with_project("group/app");
    /// assert_eq!(config.project, "group/app");
    /// ```
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Sets the authentication method.
    #[must_use]
    pub fn with_auth(mut self, auth: RegistryAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Authentication methods for registry API access.
#[derive(Clone)]
pub enum RegistryAuth {
    /// No authentication (public projects, local development).
    None,

    /// Personal, project or group access token sent as `PRIVATE-TOKEN`.
    PrivateToken {
        /// Token value.
        token: String,
    },

    /// Bearer token authentication (`OAuth2` / job tokens).
    Bearer {
        /// Token value.
        token: String,
    },
}

impl RegistryAuth {
    /// Creates private token authentication.
    ///
    /// # Examples
    ///
    /// ```
    /// use regcull_registry::RegistryAuth;
    ///
    /// let auth = RegistryAuth::private_token("glpat-xxxx");
    /// ```
    #[must_use]
    pub fn private_token(token: impl Into<String>) -> Self {
        Self::PrivateToken {
            token: token.into(),
        }
    }

    /// Creates bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }
}

// Tokens must never end up in logs.
impl std::fmt::Debug for RegistryAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::PrivateToken { .. } => write!(f, "PrivateToken {{ token: \"***\" }}"),
            Self::Bearer { .. } => write!(f, "Bearer {{ token: \"***\" }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = RegistryConfig::new("https://example.com/api/v4");
        assert_eq!(config.url, "https://example.com/api/v4");
        assert!(config.project.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("regcull/"));
    }

    #[test]
    fn test_config_builders() {
        let config = RegistryConfig::new("https://example.com/api/v4")
            .with_project("42")
            .with_auth(RegistryAuth::private_token("secret"))
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.project, "42");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(matches!(
            config.auth,
            RegistryAuth::PrivateToken { ref token } if token == "secret"
        ));
    }

    #[test]
    fn test_auth_debug_redacts_token() {
        let auth = RegistryAuth::private_token("glpat-secret");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("glpat-secret"));
        assert!(debug.contains("***"));
    }
}
