//! Streaming reader over a downloaded file

use artpath_core::{ArtifactoryError, Result};
use futures::TryStreamExt;
use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio_util::io::StreamReader;

/// Upper bound on the buffer reserved up front from `Content-Length`
const MAX_PREALLOCATION: usize = 8 << 20;

/// Buffer size to reserve for a body announcing `content_length` bytes
fn initial_capacity(content_length: Option<u64>) -> usize {
    content_length
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0)
        .min(MAX_PREALLOCATION)
}

/// Check an `open` mode string.
///
/// Only reading is supported: after dropping `b`, `t` and `U` the mode must
/// be exactly `r`.
pub fn check_read_mode(mode: &str) -> Result<()> {
    let action: String = mode.chars().filter(|c| !"btU".contains(*c)).collect();
    if action == "r" {
        Ok(())
    } else {
        Err(ArtifactoryError::unsupported(format!(
            "Unsupported mode: {mode:?}"
        )))
    }
}

/// Async reader over the body of a file download.
pub struct ArtifactReader {
    path: String,
    content_length: Option<u64>,
    inner: Pin<Box<dyn AsyncRead + Send>>,
}

impl ArtifactReader {
    pub(crate) fn from_response(path: String, response: reqwest::Response) -> Self {
        let content_length = response.content_length();
        let stream = response.bytes_stream().map_err(io::Error::other);
        Self {
            path,
            content_length,
            inner: Box::pin(StreamReader::new(stream)),
        }
    }

    /// Path being read
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Length announced by the server, if any
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Read the remaining body into memory
    pub async fn read_all(mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(initial_capacity(self.content_length));
        self.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}

impl AsyncRead for ArtifactReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.inner.as_mut().poll_read(cx, buf)
    }
}

impl fmt::Debug for ArtifactReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactReader")
            .field("path", &self.path)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_modes() {
        assert!(check_read_mode("r").is_ok());
        assert!(check_read_mode("rb").is_ok());
        assert!(check_read_mode("rt").is_ok());
        assert!(check_read_mode("rU").is_ok());

        let err = check_read_mode("w").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported mode: \"w\"");
        assert!(check_read_mode("r+").is_err());
        assert!(check_read_mode("a").is_err());
        assert!(check_read_mode("").is_err());
    }

    #[test]
    fn test_initial_capacity_is_capped() {
        assert_eq!(initial_capacity(None), 0);
        assert_eq!(initial_capacity(Some(5)), 5);
        assert_eq!(initial_capacity(Some(1_000_000_000_000_000)), MAX_PREALLOCATION);
        assert_eq!(initial_capacity(Some(u64::MAX)), MAX_PREALLOCATION);
    }

    #[tokio::test]
    async fn test_oversized_content_length_does_not_preallocate() {
        use tokio::io::AsyncWriteExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-length: 1000000000000000\r\n\
                      connection: close\r\n\r\nhello",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let response = reqwest::get(format!("http://{addr}/repo/file.txt"))
            .await
            .unwrap();
        let reader = ArtifactReader::from_response("/repo/file.txt".to_string(), response);
        assert_eq!(reader.content_length(), Some(1_000_000_000_000_000));

        // The body ends long before the announced length
        let err = reader.read_all().await.unwrap_err();
        assert!(matches!(err, ArtifactoryError::Io(_)));
    }
}
