//! Error types for Artifactory path operations.

use std::io::ErrorKind;
use thiserror::Error;

/// Result type for Artifactory path operations.
pub type Result<T> = std::result::Result<T, ArtifactoryError>;

/// Errors that can occur while resolving, querying or reading Artifactory paths.
#[derive(Error, Debug)]
pub enum ArtifactoryError {
    /// The path does not exist on the server
    #[error("File not found: {0}")]
    NotFound(String),

    /// A directory operation was attempted on a file
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// A file operation was attempted on a directory
    #[error("Is a directory: {0}")]
    IsADirectory(String),

    /// Artifactory has no symbolic links
    #[error("Not a symlink: {0}")]
    NotASymlink(String),

    /// Operation is not supported by a read-only remote path
    #[error("{0}")]
    Unsupported(String),

    /// URI could not be mapped onto a base URI and a path
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Path manipulation received an invalid argument
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Server answered with an unexpected status code
    #[error("HTTP {status} for {uri}")]
    Status { status: u16, uri: String },

    /// Server answered with a body that could not be interpreted
    #[error("Invalid response from {uri}: {reason}")]
    InvalidResponse { uri: String, reason: String },

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArtifactoryError {
    /// Helper for creating unsupported-operation errors
    ///
    /// # Example
    /// ```
    /// use artpath_core::ArtifactoryError;
    /// let err = ArtifactoryError::unsupported("Unsupported mode: 'w'");
    /// assert_eq!(err.to_string(), "Unsupported mode: 'w'");
    /// ```
    pub fn unsupported(msg: impl Into<String>) -> Self {
        ArtifactoryError::Unsupported(msg.into())
    }

    /// Helper for creating invalid-response errors
    pub fn invalid_response(uri: impl Into<String>, reason: impl ToString) -> Self {
        ArtifactoryError::InvalidResponse {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    /// The closest [`std::io::ErrorKind`] for this error.
    ///
    /// Mirrors the errno a local filesystem would report (`ENOENT`,
    /// `ENOTDIR`, `EISDIR`, `EINVAL`).
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArtifactoryError::NotFound(_) => ErrorKind::NotFound,
            ArtifactoryError::NotADirectory(_) => ErrorKind::NotADirectory,
            ArtifactoryError::IsADirectory(_) => ErrorKind::IsADirectory,
            ArtifactoryError::NotASymlink(_)
            | ArtifactoryError::InvalidUri(_)
            | ArtifactoryError::InvalidPath(_) => ErrorKind::InvalidInput,
            ArtifactoryError::Unsupported(_) => ErrorKind::Unsupported,
            ArtifactoryError::Status { status: 401 | 403, .. } => ErrorKind::PermissionDenied,
            ArtifactoryError::InvalidResponse { .. } => ErrorKind::InvalidData,
            ArtifactoryError::Io(err) => err.kind(),
            ArtifactoryError::Status { .. }
            | ArtifactoryError::Http(_)
            | ArtifactoryError::Config(_) => ErrorKind::Other,
        }
    }

    /// Whether this error means the path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifactoryError::NotFound(_))
    }
}

impl From<ArtifactoryError> for std::io::Error {
    fn from(err: ArtifactoryError) -> Self {
        match err {
            ArtifactoryError::Io(io) => io,
            other => std::io::Error::new(other.kind(), other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_match_errno() {
        assert_eq!(
            ArtifactoryError::NotFound("/repo".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ArtifactoryError::NotADirectory("/repo/file".into()).kind(),
            ErrorKind::NotADirectory
        );
        assert_eq!(
            ArtifactoryError::IsADirectory("/repo".into()).kind(),
            ErrorKind::IsADirectory
        );
        assert_eq!(
            ArtifactoryError::NotASymlink("/repo".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ArtifactoryError::Status {
                status: 403,
                uri: "http://host/artifactory/repo".into()
            }
            .kind(),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn test_malformed_body_is_invalid_data() {
        let err = ArtifactoryError::invalid_response(
            "http://host/artifactory/api/storage/repo",
            "expected value at line 1 column 1",
        );
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().starts_with("Invalid response from http://host/"));
    }

    #[test]
    fn test_into_io_error_keeps_kind() {
        let err: std::io::Error = ArtifactoryError::NotFound("/repo/missing".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("/repo/missing"));
    }
}
