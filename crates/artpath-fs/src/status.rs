//! Storage API status types
//!
//! `GET {base_uri}/api/storage/{repo}/{path}` answers with a JSON document
//! describing either a file (it carries `size`) or a folder (it carries
//! `children`).

use artpath_core::{ArtifactoryError, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Kind of entry a status describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    File,
    Directory,
}

/// Status of a file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStatus {
    pub created: Option<DateTime<FixedOffset>>,
    pub modified: Option<DateTime<FixedOffset>>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub size: u64,
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub sha256: Option<String>,
    pub mime_type: Option<String>,
}

/// Status of a folder or repository root
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryStatus {
    pub created: Option<DateTime<FixedOffset>>,
    pub modified: Option<DateTime<FixedOffset>>,
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub children: Vec<ChildEntry>,
}

/// One entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildEntry {
    /// Child name, without the leading `/` the server sends
    pub name: String,
    /// Whether the child is a folder
    pub folder: bool,
}

/// Result of a storage API lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Status {
    File(FileStatus),
    Directory(DirectoryStatus),
}

impl Status {
    /// Parse a storage API response body. `uri` is only used in error messages.
    pub fn from_storage_json(body: &str, uri: &str) -> Result<Self> {
        let raw: StorageResponse =
            serde_json::from_str(body).map_err(|e| ArtifactoryError::invalid_response(uri, e))?;
        raw.into_status(uri)
    }

    pub fn file_type(&self) -> FileType {
        match self {
            Status::File(_) => FileType::File,
            Status::Directory(_) => FileType::Directory,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Status::Directory(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Status::File(_))
    }

    /// File size in bytes; `0` for directories
    pub fn size(&self) -> u64 {
        match self {
            Status::File(file) => file.size,
            Status::Directory(_) => 0,
        }
    }

    pub fn created(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Status::File(file) => file.created,
            Status::Directory(dir) => dir.created,
        }
    }

    pub fn modified(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Status::File(file) => file.modified,
            Status::Directory(dir) => dir.modified,
        }
    }

    pub fn created_by(&self) -> Option<&str> {
        match self {
            Status::File(file) => file.created_by.as_deref(),
            Status::Directory(dir) => dir.created_by.as_deref(),
        }
    }

    pub fn modified_by(&self) -> Option<&str> {
        match self {
            Status::File(file) => file.modified_by.as_deref(),
            Status::Directory(dir) => dir.modified_by.as_deref(),
        }
    }

    pub fn as_file(&self) -> Option<&FileStatus> {
        match self {
            Status::File(file) => Some(file),
            Status::Directory(_) => None,
        }
    }

    pub fn as_dir(&self) -> Option<&DirectoryStatus> {
        match self {
            Status::File(_) => None,
            Status::Directory(dir) => Some(dir),
        }
    }

    /// Folder children; empty for files
    pub fn children(&self) -> &[ChildEntry] {
        match self {
            Status::File(_) => &[],
            Status::Directory(dir) => &dir.children,
        }
    }
}

/// Raw storage API document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageResponse {
    created: Option<String>,
    created_by: Option<String>,
    last_modified: Option<String>,
    modified_by: Option<String>,
    size: Option<SizeValue>,
    mime_type: Option<String>,
    #[serde(default)]
    checksums: Checksums,
    #[serde(default)]
    children: Vec<RawChild>,
}

/// Artifactory sends sizes as strings; accept numbers too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Number(u64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
struct Checksums {
    md5: Option<String>,
    sha1: Option<String>,
    sha256: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChild {
    uri: String,
    #[serde(default)]
    folder: bool,
}

impl StorageResponse {
    fn into_status(self, uri: &str) -> Result<Status> {
        let created = parse_optional_timestamp(self.created.as_deref(), uri)?;
        let modified = parse_optional_timestamp(self.last_modified.as_deref(), uri)?;

        match self.size {
            Some(size) => {
                let size = match size {
                    SizeValue::Number(n) => n,
                    SizeValue::Text(text) => text.trim().parse().map_err(|_| {
                        ArtifactoryError::invalid_response(uri, format!("invalid size {text:?}"))
                    })?,
                };
                Ok(Status::File(FileStatus {
                    created,
                    modified,
                    created_by: self.created_by,
                    modified_by: self.modified_by,
                    size,
                    md5: self.checksums.md5,
                    sha1: self.checksums.sha1,
                    sha256: self.checksums.sha256,
                    mime_type: self.mime_type,
                }))
            }
            None => Ok(Status::Directory(DirectoryStatus {
                created,
                modified,
                created_by: self.created_by,
                modified_by: self.modified_by,
                children: self
                    .children
                    .into_iter()
                    .map(|child| ChildEntry {
                        name: child.uri.trim_start_matches('/').to_string(),
                        folder: child.folder,
                    })
                    .collect(),
            })),
        }
    }
}

fn parse_optional_timestamp(value: Option<&str>, uri: &str) -> Result<Option<DateTime<FixedOffset>>> {
    value
        .map(|v| {
            parse_timestamp(v).ok_or_else(|| {
                ArtifactoryError::invalid_response(uri, format!("invalid timestamp {v:?}"))
            })
        })
        .transpose()
}

/// Parse an ISO 8601 timestamp as Artifactory emits it.
///
/// Accepts `Z`, `+03:00` and `+0300` offsets, with or without fractional seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}
