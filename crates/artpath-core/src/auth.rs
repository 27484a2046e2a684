//! Authentication support for Artifactory requests.
//!
//! Supported methods:
//! - API key (`X-JFrog-Art-Api` header, or any header / query parameter)
//! - Bearer access token (Authorization: Bearer <token>)
//! - Basic auth (Authorization: Basic <base64>)

use serde::{Deserialize, Serialize};

/// Header Artifactory reads API keys from.
pub const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// Authentication configuration for Artifactory requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// API key authentication
    ApiKey {
        /// Location of the API key
        #[serde(default)]
        location: AuthLocation,
        /// Name of the header or query parameter
        #[serde(default = "default_api_key_name")]
        name: String,
        /// The API key value
        key: String,
    },

    /// Bearer access token (Authorization: Bearer <token>)
    Bearer {
        /// The access token
        token: String,
    },

    /// HTTP Basic authentication (Authorization: Basic <base64>)
    Basic {
        /// Username
        username: String,
        /// Password or identity token
        password: String,
    },
}

/// Location where authentication credentials are provided.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthLocation {
    /// In HTTP header
    #[default]
    Header,
    /// In URL query parameter
    Query,
}

fn default_api_key_name() -> String {
    API_KEY_HEADER.to_string()
}

impl AuthConfig {
    /// Create Artifactory API key authentication (`X-JFrog-Art-Api` header).
    ///
    /// # Example
    ///
    /// ```
    /// use artpath_core::AuthConfig;
    ///
    /// let auth = AuthConfig::api_key("AKCp8...");
    /// assert!(!auth.is_none());
    /// ```
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey {
            location: AuthLocation::Header,
            name: default_api_key_name(),
            key: key.into(),
        }
    }

    /// Create API key authentication in an arbitrary header.
    pub fn api_key_header(header_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKey {
            location: AuthLocation::Header,
            name: header_name.into(),
            key: key.into(),
        }
    }

    /// Create API key authentication in a query parameter.
    pub fn api_key_query(param_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKey {
            location: AuthLocation::Query,
            name: param_name.into(),
            key: key.into(),
        }
    }

    /// Create bearer token authentication.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Create basic authentication.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether no credentials are configured
    pub fn is_none(&self) -> bool {
        matches!(self, AuthConfig::None)
    }

    /// Short label for logs; never includes the secret.
    pub fn method(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::ApiKey { .. } => "api_key",
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::Basic { .. } => "basic",
        }
    }

    /// Apply authentication to a reqwest RequestBuilder.
    pub(crate) fn apply_to_request(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match self {
            AuthConfig::None => builder,
            AuthConfig::ApiKey {
                location,
                name,
                key,
            } => match location {
                AuthLocation::Header => builder.header(name, key),
                AuthLocation::Query => builder.query(&[(name, key)]),
            },
            AuthConfig::Bearer { token } => builder.bearer_auth(token),
            AuthConfig::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        }
    }
}
