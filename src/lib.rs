//! # artpath
//!
//! Path-like, read-only access to JFrog Artifactory repositories.
//!
//! This facade re-exports the workspace crates: the core types (errors,
//! authentication, HTTP session, configuration) at the root, [`fs`] for
//! [`ArtifactoryPath`] and its operations, and [`telemetry`] for logging
//! and OpenTelemetry setup.

pub use artpath_fs as fs;
pub use artpath_telemetry as telemetry;

pub use artpath_core::{
    ArtConfig, ArtifactoryError, ArtifactorySession, AuthConfig, AuthLocation, Result,
    SessionBuilder, config,
};
pub use artpath_fs::{ArtifactReader, ArtifactoryPath, PathInfo, Status, WalkEntry};
