//! `ArtifactoryPath`: a path-like handle to a location on an Artifactory server

use crate::info::PathInfo;
use crate::pure;
use crate::reader::{ArtifactReader, check_read_mode};
use crate::status::Status;
use crate::storage;
use artpath_core::{ArtifactoryError, ArtifactorySession, Result};
use once_cell::sync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// Marker separating the server prefix from the repository path in full URIs
const ARTIFACTORY_MARKER: &str = "/artifactory/";

/// A path on a remote Artifactory server.
///
/// Segments are joined POSIX-style into a path string which is resolved
/// against `base_uri` (for example `http://artifactory:8080/artifactory`).
/// Requests go through the attached [`ArtifactorySession`], or through the
/// process-wide shared session when none was given.
///
/// Clones share the storage info cache. Equality and hashing only consider
/// the base URI and the path string.
///
/// # Example
///
/// ```
/// use artpath_fs::ArtifactoryPath;
///
/// let path = ArtifactoryPath::new(["/libs-release", "org/acme", "lib.jar"],
///                                 "http://artifactory:8080/artifactory");
/// assert_eq!(path.as_str(), "/libs-release/org/acme/lib.jar");
/// assert_eq!(
///     path.as_uri().unwrap(),
///     "http://artifactory:8080/artifactory/libs-release/org/acme/lib.jar"
/// );
/// ```
#[derive(Clone)]
pub struct ArtifactoryPath {
    segments: Vec<String>,
    path: String,
    base_uri: String,
    session: Option<ArtifactorySession>,
    info: Arc<OnceCell<Arc<PathInfo>>>,
}

impl ArtifactoryPath {
    /// Create a path from segments and the server's base URI
    pub fn new<I, S>(segments: I, base_uri: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        Self {
            path: pure::join(&segments),
            segments,
            base_uri: base_uri.into(),
            session: None,
            info: Arc::new(OnceCell::new()),
        }
    }

    /// Attach a session carrying authentication and transport settings
    pub fn with_session(mut self, session: ArtifactorySession) -> Self {
        self.session = Some(session);
        self.info = Arc::new(OnceCell::new());
        self
    }

    /// Create a path sharing this path's base URI and session
    pub fn with_segments<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::new(segments, self.base_uri.clone());
        path.session = self.session.clone();
        path
    }

    /// Parse a full URI such as `http://host/artifactory/repo/dir/file`.
    ///
    /// Everything up to the first `/artifactory/` (plus `/artifactory`)
    /// becomes the base URI; the rest, percent-decoded, becomes the
    /// absolute path.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let (head, tail) = uri.split_once(ARTIFACTORY_MARKER).ok_or_else(|| {
            ArtifactoryError::InvalidUri(format!(
                "{uri:?} does not contain {ARTIFACTORY_MARKER:?}"
            ))
        })?;
        let tail = urlencoding::decode(tail)
            .map_err(|e| ArtifactoryError::InvalidUri(format!("{uri:?}: {e}")))?;
        Ok(Self::new([format!("/{tail}")], format!("{head}/artifactory")))
    }

    /// The joined path string
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Segments this path was built from
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Session used for requests: the attached one or the shared default
    pub fn session(&self) -> ArtifactorySession {
        self.session
            .clone()
            .unwrap_or_else(ArtifactorySession::shared)
    }

    /// Session explicitly attached to this path, if any
    pub fn custom_session(&self) -> Option<&ArtifactorySession> {
        self.session.as_ref()
    }

    // -- pure path operations --

    pub fn is_absolute(&self) -> bool {
        pure::is_absolute(&self.path)
    }

    /// This path if absolute; relative paths cannot be resolved remotely
    pub fn absolute(&self) -> Result<Self> {
        if self.is_absolute() {
            Ok(self.clone())
        } else {
            Err(ArtifactoryError::unsupported(format!(
                "Relative path: {self:?}"
            )))
        }
    }

    /// Final component, empty for paths ending in `/`
    pub fn name(&self) -> &str {
        pure::name(&self.path)
    }

    pub fn suffix(&self) -> &str {
        pure::suffix(&self.path)
    }

    pub fn suffixes(&self) -> Vec<String> {
        pure::suffixes(&self.path)
    }

    pub fn stem(&self) -> &str {
        pure::stem(&self.path)
    }

    /// Anchor followed by the non-empty components
    pub fn parts(&self) -> Vec<&str> {
        pure::parts(&self.path)
    }

    /// Logical parent; the path itself when it has none
    pub fn parent(&self) -> Self {
        let parent = pure::parent(&self.path);
        if parent == self.path {
            self.clone()
        } else {
            self.with_segments([parent])
        }
    }

    /// All ancestors, nearest first
    pub fn parents(&self) -> Vec<Self> {
        let mut parents = Vec::new();
        let mut current = self.clone();
        loop {
            let parent = current.parent();
            if parent.path == current.path {
                return parents;
            }
            parents.push(parent.clone());
            current = parent;
        }
    }

    /// Append a segment (a segment starting with `/` replaces the path)
    pub fn joinpath(&self, segment: impl AsRef<str>) -> Self {
        self.with_segments([self.path.as_str(), segment.as_ref()])
    }

    pub fn with_name(&self, name: &str) -> Result<Self> {
        Ok(self.with_segments([pure::with_name(&self.path, name)?]))
    }

    pub fn with_stem(&self, stem: &str) -> Result<Self> {
        Ok(self.with_segments([pure::with_stem(&self.path, stem)?]))
    }

    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        Ok(self.with_segments([pure::with_suffix(&self.path, suffix)?]))
    }

    /// Relative path from `other` to this path
    pub fn relative_to(&self, other: &ArtifactoryPath) -> Result<Self> {
        Ok(self.with_segments([pure::relative_to(&self.path, &other.path)?]))
    }

    pub fn is_relative_to(&self, other: &ArtifactoryPath) -> bool {
        pure::relative_to(&self.path, &other.path).is_ok()
    }

    /// Whether the whole path matches a glob pattern (`*`, `?`, `[...]`, `**`)
    pub fn full_match(&self, pattern: &str) -> Result<bool> {
        pure::full_match(&self.path, pattern)
    }

    // -- URI mapping --

    /// Download URI: base URI followed by the percent-encoded absolute path
    pub fn as_uri(&self) -> Result<String> {
        let absolute = self.absolute()?;
        Ok(storage::download_uri(&self.base_uri, &absolute.path))
    }

    /// Storage API URI describing this path
    pub fn storage_uri(&self) -> Result<String> {
        let absolute = self.absolute()?;
        Ok(storage::storage_uri(&self.base_uri, &absolute.path))
    }

    // -- queries --

    /// Cached storage information; created on first use
    pub fn info(&self) -> Result<&PathInfo> {
        let info = self.info.get_or_try_init(|| {
            let absolute = self.absolute()?;
            Ok::<_, ArtifactoryError>(Arc::new(PathInfo::new(
                self.session(),
                self.base_uri.clone(),
                absolute.path,
            )))
        })?;
        Ok(info.as_ref())
    }

    /// Fresh storage status (bypasses the info cache)
    pub async fn stat(&self) -> Result<Status> {
        let absolute = self.absolute()?;
        storage::fetch_status(&self.session(), &self.base_uri, &absolute.path).await
    }

    /// Whether this path exists
    pub async fn exists(&self) -> Result<bool> {
        self.info()?.exists().await
    }

    /// Whether this path is a directory
    pub async fn is_dir(&self) -> Result<bool> {
        self.info()?.is_dir().await
    }

    /// Whether this path is a regular file
    pub async fn is_file(&self) -> Result<bool> {
        self.info()?.is_file().await
    }

    /// Whether this path is a symbolic link; never true on Artifactory
    pub fn is_symlink(&self) -> bool {
        false
    }

    /// File size in bytes, `0` for directories
    pub async fn size(&self) -> Result<u64> {
        self.info()?.size().await
    }

    pub fn readlink(&self) -> Result<Self> {
        Err(ArtifactoryError::NotASymlink(self.path.clone()))
    }

    /// Children of this directory.
    ///
    /// Children know whether they exist and are folders without further
    /// requests.
    pub async fn iterdir(&self) -> Result<Vec<Self>> {
        let info = self.info()?;
        let status = info
            .status()
            .await?
            .ok_or_else(|| ArtifactoryError::NotFound(self.path.clone()))?;
        let dir = status
            .as_dir()
            .ok_or_else(|| ArtifactoryError::NotADirectory(self.path.clone()))?;

        debug!(path = %self.path, children = dir.children.len(), "Listing directory");

        let session = self.session();
        Ok(dir
            .children
            .iter()
            .map(|child| {
                let path = self.joinpath(&child.name);
                let info = PathInfo::listed(
                    session.clone(),
                    self.base_uri.clone(),
                    path.path.clone(),
                    child.folder,
                );
                let _ = path.info.set(Arc::new(info));
                path
            })
            .collect())
    }

    // -- reading --

    /// Open the file for streaming reads
    pub async fn open(&self) -> Result<ArtifactReader> {
        let status = self.stat().await?;
        if status.is_dir() {
            return Err(ArtifactoryError::IsADirectory(self.path.clone()));
        }
        let response = storage::download(&self.session(), &self.base_uri, &self.path).await?;
        Ok(ArtifactReader::from_response(self.path.clone(), response))
    }

    /// Open with a mode string; only read modes (`r`, `rb`, `rt`) are supported
    pub async fn open_with_mode(&self, mode: &str) -> Result<ArtifactReader> {
        check_read_mode(mode)?;
        self.open().await
    }

    /// Whole file content
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        self.open().await?.read_all().await
    }

    /// Whole file content decoded as UTF-8
    pub async fn read_text(&self) -> Result<String> {
        let bytes = self.read_bytes().await?;
        String::from_utf8(bytes).map_err(|e| {
            ArtifactoryError::invalid_response(self.as_uri().unwrap_or_default(), e)
        })
    }

    /// Up to `len` bytes starting at `offset`
    pub async fn read_range(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let absolute = self.absolute()?;
        storage::download_range(&self.session(), &self.base_uri, &absolute.path, offset, len).await
    }
}

impl fmt::Debug for ArtifactoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArtifactoryPath({:?}, base_uri={:?})",
            self.path, self.base_uri
        )
    }
}

impl fmt::Display for ArtifactoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for ArtifactoryPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl PartialEq for ArtifactoryPath {
    fn eq(&self, other: &Self) -> bool {
        self.base_uri == other.base_uri && self.path == other.path
    }
}

impl Eq for ArtifactoryPath {}

impl Hash for ArtifactoryPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base_uri.hash(state);
        self.path.hash(state);
    }
}
