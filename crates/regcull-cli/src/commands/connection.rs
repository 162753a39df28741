//! GitLab connection arguments.

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use regcull_registry::{RegistryAuth, RegistryConfig};

/// Arguments locating and authenticating against a project's registry.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// GitLab API base URL (e.g., `<https://gitlab.example.com/api/v4>`)
    #[arg(long, env = "GITLAB_API")]
    pub api_url: String,

    /// Project id or full path (e.g., `group/app`)
    #[arg(short, long, env = "GITLAB_PROJECT_ID")]
    pub project: String,

    /// Access token with the `api` scope
    #[arg(long, env = "GITLAB_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Send the token as an OAuth2 bearer token instead of `PRIVATE-TOKEN`
    #[arg(long, requires = "token")]
    pub bearer: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl ConnectionArgs {
    /// Builds the registry client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is given but empty.
    pub fn registry_config(&self) -> Result<RegistryConfig> {
        Ok(RegistryConfig::new(&self.api_url)
            .with_project(&self.project)
            .with_auth(determine_auth(self)?)
            .with_timeout(Duration::from_secs(self.timeout)))
    }
}

/// Determines the authentication method from CLI arguments.
fn determine_auth(args: &ConnectionArgs) -> Result<RegistryAuth> {
    let Some(token) = args.token.as_deref() else {
        // No auth - only public projects can be read this way
        return Ok(RegistryAuth::None);
    };

    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Access token is empty; set --token or GITLAB_ACCESS_TOKEN");
    }

    if args.bearer {
        Ok(RegistryAuth::bearer(token))
    } else {
        Ok(RegistryAuth::private_token(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(token: Option<&str>, bearer: bool) -> ConnectionArgs {
        ConnectionArgs {
            api_url: "https://gitlab.example.com/api/v4".to_string(),
            project: "group/app".to_string(),
            token: token.map(str::to_string),
            bearer,
            timeout: 30,
        }
    }

    #[test]
    fn test_determine_auth_none() {
        let auth = determine_auth(&args(None, false)).unwrap();
        assert!(matches!(auth, RegistryAuth::None));
    }

    #[test]
    fn test_determine_auth_private_token() {
        let auth = determine_auth(&args(Some("glpat-secret"), false)).unwrap();
        assert!(matches!(auth, RegistryAuth::PrivateToken { ref token } if token == "glpat-secret"));
    }

    #[test]
    fn test_determine_auth_bearer() {
        let auth = determine_auth(&args(Some("oauth-token"), true)).unwrap();
        assert!(matches!(auth, RegistryAuth::Bearer { ref token } if token == "oauth-token"));
    }

    #[test]
    fn test_determine_auth_empty_token() {
        assert!(determine_auth(&args(Some("  "), false)).is_err());
    }

    #[test]
    fn test_registry_config() {
        let mut connection = args(Some("glpat-secret"), false);
        connection.timeout = 5;

        let config = connection.registry_config().unwrap();

        assert_eq!(config.url, "https://gitlab.example.com/api/v4");
        assert_eq!(config.project, "group/app");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(matches!(config.auth, RegistryAuth::PrivateToken { .. }));
    }
}
