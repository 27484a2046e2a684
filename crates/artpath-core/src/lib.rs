//! Core types for artpath
//!
//! This crate provides the error model, authentication, HTTP session and
//! configuration shared by the Artifactory path implementation and the CLI.

pub mod auth;
pub mod config;
pub mod error;
pub mod session;

// Re-exports
pub use auth::{API_KEY_HEADER, AuthConfig, AuthLocation};
pub use config::{ArtConfig, HttpConfig, ObservabilityConfig, ServerConfig};
pub use error::{ArtifactoryError, Result};
pub use session::{ArtifactorySession, SessionBuilder, check_status};
