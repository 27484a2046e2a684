//! Shared HTTP session for Artifactory requests.
//!
//! A session bundles a pooled `reqwest::Client` with the authentication and
//! default headers every request should carry. Cloning is cheap; all clones
//! share the connection pool.

use crate::auth::AuthConfig;
use crate::error::{ArtifactoryError, Result};
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Process-wide session used by paths that were not given one.
static DEFAULT_SESSION: Lazy<ArtifactorySession> = Lazy::new(ArtifactorySession::new);

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("artpath/", env!("CARGO_PKG_VERSION"));

/// HTTP session carrying transport configuration shared across requests.
#[derive(Clone, Debug)]
pub struct ArtifactorySession {
    client: Client,
    auth: Arc<AuthConfig>,
}

impl ArtifactorySession {
    /// Create an unauthenticated session with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            auth: Arc::new(AuthConfig::None),
        }
    }

    /// Wrap an already configured `reqwest::Client`.
    ///
    /// Use this to inject proxies, custom TLS roots or default headers.
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            auth: Arc::new(AuthConfig::None),
        }
    }

    /// Start building a session
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// The shared process-wide default session
    pub fn shared() -> ArtifactorySession {
        DEFAULT_SESSION.clone()
    }

    /// Replace the authentication of this session
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// Authentication applied to every request
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// The underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Build an authenticated GET request
    pub fn get(&self, uri: &str) -> RequestBuilder {
        self.auth.apply_to_request(self.client.get(uri))
    }
}

impl Default for ArtifactorySession {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an HTTP response status to the crate's error model
pub fn check_status(response: Response, uri: &str, path: &str) -> Result<Response> {
    let status = response.status();
    debug!(uri, status = status.as_u16(), "Artifactory response");
    if status == StatusCode::NOT_FOUND {
        return Err(ArtifactoryError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        return Err(ArtifactoryError::Status {
            status: status.as_u16(),
            uri: uri.to_string(),
        });
    }
    Ok(response)
}

/// Builder for [`ArtifactorySession`].
#[derive(Debug, Default)]
pub struct SessionBuilder {
    auth: AuthConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    headers: Vec<(String, String)>,
}

impl SessionBuilder {
    /// Authentication for every request
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Total request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// User-Agent header (defaults to [`DEFAULT_USER_AGENT`])
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Extra header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the session
    pub fn build(self) -> Result<ArtifactorySession> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ArtifactoryError::Config(format!("Invalid header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ArtifactoryError::Config(format!("Invalid value for header '{name}': {e}"))
            })?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ArtifactorySession {
            client: builder.build()?,
            auth: Arc::new(self.auth),
        })
    }
}
