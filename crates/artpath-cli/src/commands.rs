use anyhow::{Context, Result, bail};
use artpath_core::ArtifactorySession;
use artpath_fs::ArtifactoryPath;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Where command arguments are resolved: a default base URI and the session to use
pub struct Target {
    base_uri: Option<String>,
    session: ArtifactorySession,
}

impl Target {
    pub fn new(base_uri: Option<String>, session: ArtifactorySession) -> Self {
        Self {
            base_uri: base_uri.map(|uri| uri.trim_end_matches('/').to_string()),
            session,
        }
    }

    /// Resolve a full `…/artifactory/…` URI, or a repository path against the base URI
    pub fn resolve(&self, arg: &str) -> Result<ArtifactoryPath> {
        let path = if arg.contains("://") {
            ArtifactoryPath::from_uri(arg)?
        } else {
            let Some(ref base_uri) = self.base_uri else {
                bail!(
                    "{arg:?} is not a full URI and no base URI is configured \
                     (use --base-uri, server.base_uri or ARTIFACTORY_URL)"
                );
            };
            let arg = if arg.starts_with('/') {
                arg.to_string()
            } else {
                format!("/{arg}")
            };
            ArtifactoryPath::new([arg], base_uri.as_str())
        };
        Ok(path.with_session(self.session.clone()))
    }
}

pub async fn stat<W: AsyncWrite + Unpin>(target: &Target, arg: &str, out: &mut W) -> Result<()> {
    let path = target.resolve(arg)?;
    let status = path
        .stat()
        .await
        .with_context(|| format!("Failed to stat {path}"))?;
    let json = serde_json::to_string_pretty(&status)?;
    out.write_all(json.as_bytes()).await?;
    out.write_all(b"\n").await?;
    Ok(())
}

pub async fn ls<W: AsyncWrite + Unpin>(
    target: &Target,
    arg: &str,
    long: bool,
    out: &mut W,
) -> Result<()> {
    let path = target.resolve(arg)?;
    let children = path
        .iterdir()
        .await
        .with_context(|| format!("Failed to list {path}"))?;

    for child in children {
        let is_dir = child.is_dir().await?;
        let line = match (long, is_dir) {
            (false, true) => format!("{}/\n", child.name()),
            (false, false) => format!("{}\n", child.name()),
            (true, true) => format!("d {:>12} {}/\n", "-", child.name()),
            (true, false) => format!("- {:>12} {}\n", child.size().await?, child.name()),
        };
        out.write_all(line.as_bytes()).await?;
    }
    Ok(())
}

pub async fn cat<W: AsyncWrite + Unpin>(
    target: &Target,
    arg: &str,
    offset: Option<u64>,
    length: Option<u64>,
    out: &mut W,
) -> Result<()> {
    let path = target.resolve(arg)?;
    match length {
        Some(length) => {
            let bytes = path
                .read_range(offset.unwrap_or(0), length)
                .await
                .with_context(|| format!("Failed to read {path}"))?;
            out.write_all(&bytes).await?;
        }
        None => {
            let mut reader = path
                .open()
                .await
                .with_context(|| format!("Failed to open {path}"))?;
            tokio::io::copy(&mut reader, out).await?;
        }
    }
    out.flush().await?;
    Ok(())
}

pub async fn walk<W: AsyncWrite + Unpin>(
    target: &Target,
    arg: &str,
    top_down: bool,
    out: &mut W,
) -> Result<()> {
    let path = target.resolve(arg)?;
    let entries = path
        .walk(top_down)
        .await
        .with_context(|| format!("Failed to walk {path}"))?;

    for entry in entries {
        let line = format!(
            "{}  dirs={:?} files={:?}\n",
            entry.dir, entry.dirnames, entry.filenames
        );
        out.write_all(line.as_bytes()).await?;
    }
    Ok(())
}

pub async fn glob<W: AsyncWrite + Unpin>(
    target: &Target,
    arg: &str,
    pattern: &str,
    out: &mut W,
) -> Result<()> {
    let path = target.resolve(arg)?;
    let matches = path
        .glob(pattern)
        .await
        .with_context(|| format!("Failed to glob {pattern:?} under {path}"))?;

    for found in matches {
        out.write_all(format!("{found}\n").as_bytes()).await?;
    }
    Ok(())
}

pub async fn uri<W: AsyncWrite + Unpin>(target: &Target, arg: &str, out: &mut W) -> Result<()> {
    let path = target.resolve(arg)?;
    let text = format!(
        "base_uri:    {}\npath:        {}\ndownload:    {}\nstorage_api: {}\n",
        path.base_uri(),
        path,
        path.as_uri()?,
        path.storage_uri()?
    );
    out.write_all(text.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(base_uri: Option<&str>) -> Target {
        Target::new(base_uri.map(str::to_string), ArtifactorySession::new())
    }

    #[test]
    fn test_resolve_full_uri() {
        let path = target(None)
            .resolve("http://artifactory:8080/artifactory/repo/dir/")
            .unwrap();
        assert_eq!(path.base_uri(), "http://artifactory:8080/artifactory");
        assert_eq!(path.as_str(), "/repo/dir/");
        assert!(path.custom_session().is_some());
    }

    #[test]
    fn test_resolve_against_base_uri() {
        let target = target(Some("http://artifactory:8080/artifactory/"));
        let path = target.resolve("repo/file.txt").unwrap();
        assert_eq!(
            path.as_uri().unwrap(),
            "http://artifactory:8080/artifactory/repo/file.txt"
        );
        assert_eq!(target.resolve("/repo").unwrap().as_str(), "/repo");
    }

    #[test]
    fn test_resolve_without_base_uri_fails() {
        let err = target(None).resolve("repo/file").unwrap_err();
        assert!(err.to_string().contains("no base URI"));
    }

    #[tokio::test]
    async fn test_ls_and_cat() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/artifactory/api/storage/repo")
            .with_status(200)
            .with_body(
                r#"{"children": [{"uri": "/dir", "folder": true},
                                 {"uri": "/a.txt", "folder": false}]}"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/artifactory/api/storage/repo/a.txt")
            .with_status(200)
            .with_body(r#"{"size": "5"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/artifactory/repo/a.txt")
            .with_status(200)
            .with_body("hello")
            .create_async()
            .await;

        let target = target(Some(&format!("{}/artifactory", server.url())));

        let mut out = Vec::new();
        ls(&target, "repo", false, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "dir/\na.txt\n");

        let mut out = Vec::new();
        ls(&target, "repo", true, &mut out).await.unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("d            - dir/"));
        assert!(listing.contains("-            5 a.txt"));

        let mut out = Vec::new();
        cat(&target, "repo/a.txt", None, None, &mut out).await.unwrap();
        assert_eq!(out, b"hello");
    }

    #[tokio::test]
    async fn test_uri_command() {
        let target = target(Some("http://artifactory:8080/artifactory"));
        let mut out = Vec::new();
        uri(&target, "repo/x", &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("download:    http://artifactory:8080/artifactory/repo/x"));
        assert!(text.contains("storage_api: http://artifactory:8080/artifactory/api/storage/repo/x"));
    }
}
