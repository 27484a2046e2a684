//! # artpath
//!
//! Read-only filesystem-style access to JFrog Artifactory repositories.
//!
//! An [`ArtifactoryPath`] joins path segments like a POSIX path, is anchored
//! at a server base URI, and answers filesystem questions (`stat`, `exists`,
//! `iterdir`, `walk`, `glob`, reads) through the Artifactory storage API.
//!
//! ## Example
//!
//! ```no_run
//! use artpath_core::{ArtifactorySession, AuthConfig};
//! use artpath_fs::ArtifactoryPath;
//!
//! # #[tokio::main]
//! # async fn main() -> artpath_core::Result<()> {
//! let session = ArtifactorySession::builder()
//!     .auth(AuthConfig::bearer(std::env::var("ARTIFACTORY_TOKEN").unwrap_or_default()))
//!     .build()?;
//!
//! let repo = ArtifactoryPath::from_uri("https://example.jfrog.io/artifactory/libs-release")?
//!     .with_session(session);
//!
//! for child in repo.iterdir().await? {
//!     println!("{} dir={}", child, child.is_dir().await?);
//! }
//! # Ok(())
//! # }
//! ```

mod info;
mod path;
mod pure;
mod reader;
mod status;
mod storage;
mod walk;

pub use info::PathInfo;
pub use path::ArtifactoryPath;
pub use reader::{ArtifactReader, check_read_mode};
pub use status::{ChildEntry, DirectoryStatus, FileStatus, FileType, Status, parse_timestamp};
pub use walk::WalkEntry;

/// POSIX path helpers used by [`ArtifactoryPath`]
pub mod posix {
    pub use crate::pure::{join, split};
}
