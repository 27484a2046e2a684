//! Cached storage information for a path

use crate::status::{ChildEntry, Status};
use crate::storage::{fetch_status, storage_uri};
use artpath_core::{ArtifactoryError, ArtifactorySession, Result};
use tokio::sync::OnceCell;

/// Lazily queried, cached storage status of one absolute path.
///
/// The storage API is queried at most once; concurrent callers wait on the
/// same request. Entries produced by a folder listing start out knowing that
/// they exist and whether they are folders, so `exists`, `is_dir` and
/// `is_file` cost no request for them.
#[derive(Debug)]
pub struct PathInfo {
    session: ArtifactorySession,
    base_uri: String,
    path: String,
    listed_as_dir: Option<bool>,
    status: OnceCell<Option<Status>>,
}

impl PathInfo {
    pub(crate) fn new(session: ArtifactorySession, base_uri: String, path: String) -> Self {
        Self {
            session,
            base_uri,
            path,
            listed_as_dir: None,
            status: OnceCell::new(),
        }
    }

    pub(crate) fn listed(
        session: ArtifactorySession,
        base_uri: String,
        path: String,
        is_dir: bool,
    ) -> Self {
        Self {
            listed_as_dir: Some(is_dir),
            ..Self::new(session, base_uri, path)
        }
    }

    /// Storage API URI this info queries
    pub fn storage_uri(&self) -> String {
        storage_uri(&self.base_uri, &self.path)
    }

    /// Whether the storage query already ran
    pub fn is_cached(&self) -> bool {
        self.status.initialized()
    }

    /// Cached status; `None` when the path does not exist
    pub async fn status(&self) -> Result<Option<&Status>> {
        let status = self
            .status
            .get_or_try_init(|| async {
                match fetch_status(&self.session, &self.base_uri, &self.path).await {
                    Ok(status) => Ok(Some(status)),
                    Err(err) if err.is_not_found() => Ok(None),
                    Err(err) => Err(err),
                }
            })
            .await?;
        Ok(status.as_ref())
    }

    pub async fn exists(&self) -> Result<bool> {
        if self.listed_as_dir.is_some() {
            return Ok(true);
        }
        Ok(self.status().await?.is_some())
    }

    pub async fn is_dir(&self) -> Result<bool> {
        if let Some(is_dir) = self.listed_as_dir {
            return Ok(is_dir);
        }
        Ok(self.status().await?.is_some_and(Status::is_dir))
    }

    pub async fn is_file(&self) -> Result<bool> {
        if let Some(is_dir) = self.listed_as_dir {
            return Ok(!is_dir);
        }
        Ok(self.status().await?.is_some_and(Status::is_file))
    }

    /// Artifactory has no symbolic links
    pub fn is_symlink(&self) -> bool {
        false
    }

    /// Size in bytes, `0` for folders
    pub async fn size(&self) -> Result<u64> {
        self.status()
            .await?
            .map(Status::size)
            .ok_or_else(|| ArtifactoryError::NotFound(self.path.clone()))
    }

    /// Folder listing; empty for files
    pub async fn children(&self) -> Result<Vec<ChildEntry>> {
        self.status()
            .await?
            .map(|status| status.children().to_vec())
            .ok_or_else(|| ArtifactoryError::NotFound(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listed_info_answers_without_request() {
        // Port 9 (discard) is never queried: any request would fail the test
        let info = PathInfo::listed(
            ArtifactorySession::new(),
            "http://127.0.0.1:9/artifactory".to_string(),
            "/repo/dir".to_string(),
            true,
        );
        assert!(info.exists().await.unwrap());
        assert!(info.is_dir().await.unwrap());
        assert!(!info.is_file().await.unwrap());
        assert!(!info.is_symlink());
        assert!(!info.is_cached());
    }

    #[tokio::test]
    async fn test_status_is_queried_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/artifactory/api/storage/repo/file.txt")
            .with_status(200)
            .with_body(r#"{"size": "12", "checksums": {}}"#)
            .expect(1)
            .create_async()
            .await;

        let info = PathInfo::new(
            ArtifactorySession::new(),
            format!("{}/artifactory", server.url()),
            "/repo/file.txt".to_string(),
        );

        assert!(info.exists().await.unwrap());
        assert!(info.is_file().await.unwrap());
        assert_eq!(info.size().await.unwrap(), 12);
        assert!(info.children().await.unwrap().is_empty());
        assert!(info.is_cached());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/artifactory/api/storage/repo/lib.jar")
            .with_status(200)
            .with_body(r#"{"size": 2048, "checksums": {"sha256": "abc"}}"#)
            .expect(1)
            .create_async()
            .await;

        let info = PathInfo::new(
            ArtifactorySession::new(),
            format!("{}/artifactory", server.url()),
            "/repo/lib.jar".to_string(),
        );

        let (exists, is_file, size) = tokio::join!(info.exists(), info.is_file(), info.size());
        assert!(exists.unwrap());
        assert!(is_file.unwrap());
        assert_eq!(size.unwrap(), 2048);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/artifactory/api/storage/repo/missing")
            .with_status(404)
            .create_async()
            .await;

        let info = PathInfo::new(
            ArtifactorySession::new(),
            format!("{}/artifactory", server.url()),
            "/repo/missing".to_string(),
        );

        assert!(!info.exists().await.unwrap());
        assert!(!info.is_dir().await.unwrap());
        assert!(!info.is_file().await.unwrap());
        assert!(info.size().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_server_errors_propagate() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/artifactory/api/storage/repo")
            .with_status(500)
            .create_async()
            .await;

        let info = PathInfo::new(
            ArtifactorySession::new(),
            format!("{}/artifactory", server.url()),
            "/repo".to_string(),
        );

        let err = info.exists().await.unwrap_err();
        assert!(matches!(err, ArtifactoryError::Status { status: 500, .. }));
        assert!(!info.is_cached());
    }
}
