//! Configuration management for artpath
//!
//! Loads configuration with priority:
//! 1. artpath.toml (or specified config file)
//! 2. Environment variables (fallback)
//! 3. Defaults

use crate::auth::AuthConfig;
use crate::session::ArtifactorySession;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = "artpath.toml";

/// artpath configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication (none, api_key, bearer or basic)
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Artifactory server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root endpoint, e.g. `https://example.jfrog.io/artifactory`
    /// (can reference env var with ${VAR_NAME})
    pub base_uri: Option<String>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,

    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_filter: default_log_filter(),
        }
    }
}

impl ArtConfig {
    /// Load configuration with the following priority:
    /// 1. artpath.toml in current directory or a parent
    /// 2. Environment variables (fallback)
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("No {} found, using environment", CONFIG_FILE_NAME);
                Ok(Self::from_env())
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from: {:?}", path);

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: ArtConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.resolve_env_vars();
        config.validate()?;

        Ok(config)
    }

    /// Build configuration purely from environment variables.
    ///
    /// Reads `ARTIFACTORY_URL`, then credentials in order of preference:
    /// `ARTIFACTORY_TOKEN`, `ARTIFACTORY_API_KEY`,
    /// `ARTIFACTORY_USER` + `ARTIFACTORY_PASSWORD`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.server.base_uri = env::var("ARTIFACTORY_URL").ok();
        config.auth = Self::auth_from_env();
        config
    }

    fn auth_from_env() -> AuthConfig {
        if let Ok(token) = env::var("ARTIFACTORY_TOKEN") {
            return AuthConfig::bearer(token);
        }
        if let Ok(key) = env::var("ARTIFACTORY_API_KEY") {
            return AuthConfig::api_key(key);
        }
        match (env::var("ARTIFACTORY_USER"), env::var("ARTIFACTORY_PASSWORD")) {
            (Ok(user), Ok(password)) => AuthConfig::basic(user, password),
            _ => AuthConfig::None,
        }
    }

    /// Find artpath.toml by searching current directory and parents
    fn find_config_file() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve ${VAR_NAME} references to environment variables
    fn resolve_env_vars(&mut self) {
        match self.server.base_uri {
            Some(ref uri) => self.server.base_uri = Self::resolve_env_var(uri),
            None => self.server.base_uri = env::var("ARTIFACTORY_URL").ok(),
        }

        match self.auth {
            AuthConfig::None => self.auth = Self::auth_from_env(),
            AuthConfig::ApiKey { ref mut key, .. } => {
                if let Some(resolved) = Self::resolve_env_var(key) {
                    *key = resolved;
                }
            }
            AuthConfig::Bearer { ref mut token } => {
                if let Some(resolved) = Self::resolve_env_var(token) {
                    *token = resolved;
                }
            }
            AuthConfig::Basic {
                ref mut username,
                ref mut password,
            } => {
                if let Some(resolved) = Self::resolve_env_var(username) {
                    *username = resolved;
                }
                if let Some(resolved) = Self::resolve_env_var(password) {
                    *password = resolved;
                }
            }
        }

        for value in self.http.headers.values_mut() {
            if let Some(resolved) = Self::resolve_env_var(value) {
                *value = resolved;
            }
        }
    }

    /// Resolve a single ${VAR_NAME} reference
    fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            env::var(var_name).ok()
        } else {
            Some(value.to_string())
        }
    }

    fn validate(&mut self) -> Result<()> {
        if let Some(ref uri) = self.server.base_uri {
            url::Url::parse(uri).with_context(|| format!("Invalid server.base_uri: {uri}"))?;
            self.server.base_uri = Some(uri.trim_end_matches('/').to_string());
        }
        Ok(())
    }

    /// Base URI with a clear error message when missing
    pub fn base_uri(&self) -> Result<&str> {
        self.server.base_uri.as_deref().ok_or_else(|| {
            anyhow!(
                "Artifactory base URI not configured. Add to {}:\n\
                [server]\n\
                base_uri = \"https://example.jfrog.io/artifactory\"\n\
                \n\
                Or set environment variable:\n\
                export ARTIFACTORY_URL=\"https://example.jfrog.io/artifactory\"",
                CONFIG_FILE_NAME
            )
        })
    }

    /// Build an HTTP session from the auth and http sections
    pub fn session(&self) -> crate::Result<ArtifactorySession> {
        let mut builder = ArtifactorySession::builder()
            .auth(self.auth.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs));
        if let Some(ref user_agent) = self.http.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        for (name, value) in &self.http.headers {
            builder = builder.header(name.clone(), value.clone());
        }
        builder.build()
    }

    /// Create test-friendly defaults (no server required)
    pub fn test_defaults() -> Self {
        Self {
            server: ServerConfig {
                base_uri: Some("http://artifactory:8080/artifactory".to_string()),
            },
            auth: AuthConfig::api_key("test-api-key"),
            http: HttpConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ArtConfig::test_defaults();
        assert_eq!(
            config.base_uri().unwrap(),
            "http://artifactory:8080/artifactory"
        );
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.session().is_ok());
    }

    #[test]
    fn test_resolve_env_var() {
        unsafe {
            env::set_var("ARTPATH_TEST_VAR", "test_value");
        }

        let resolved = ArtConfig::resolve_env_var("${ARTPATH_TEST_VAR}");
        assert_eq!(resolved, Some("test_value".to_string()));

        let not_var = ArtConfig::resolve_env_var("plain_value");
        assert_eq!(not_var, Some("plain_value".to_string()));

        unsafe {
            env::remove_var("ARTPATH_TEST_VAR");
        }
    }

    #[test]
    fn test_load_from_file() {
        unsafe {
            env::set_var("ARTPATH_TEST_TOKEN", "from-env");
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
base_uri = "https://example.jfrog.io/artifactory/"

[auth]
type = "bearer"
token = "${{ARTPATH_TEST_TOKEN}}"

[http]
timeout_secs = 5
headers = {{ "X-Team" = "builds" }}

[observability]
json_logs = true
"#
        )
        .unwrap();

        let config = ArtConfig::load_from(file.path()).unwrap();
        assert_eq!(
            config.base_uri().unwrap(),
            "https://example.jfrog.io/artifactory"
        );
        assert_eq!(config.auth, AuthConfig::bearer("from-env"));
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.headers["X-Team"], "builds");
        assert!(config.observability.json_logs);
        assert_eq!(config.observability.log_filter, "info");

        unsafe {
            env::remove_var("ARTPATH_TEST_TOKEN");
        }
    }

    #[test]
    fn test_invalid_base_uri_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server]\nbase_uri = \"not a uri\"\n").unwrap();

        let err = ArtConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid server.base_uri"));
    }

    #[test]
    fn test_missing_base_uri_error_message() {
        let config = ArtConfig::default();
        let err = config.base_uri().unwrap_err();
        assert!(err.to_string().contains("ARTIFACTORY_URL"));
    }
}
