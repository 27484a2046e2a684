//! Requests against the Artifactory storage and download endpoints

use crate::pure::SEP;
use crate::status::Status;
use artpath_core::{ArtifactorySession, Result, check_status};
use artpath_telemetry::{RequestKind, RequestSpanAttributes, record_response, request_span};
use reqwest::header::RANGE;
use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{Instrument, Span, debug};

/// Percent-encode each component of `path`, keeping the separators
pub(crate) fn encode_path(path: &str) -> String {
    path.split(SEP)
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// `{base_uri}/api/storage{path}` for an absolute path
pub(crate) fn storage_uri(base_uri: &str, path: &str) -> String {
    format!("{base_uri}/api/storage{}", encode_path(path))
}

/// `{base_uri}{path}`: where the file content is served
pub(crate) fn download_uri(base_uri: &str, path: &str) -> String {
    format!("{base_uri}{}", encode_path(path))
}

/// Send a request inside an `artifactory.request` span and record its status
async fn send_traced(request: RequestBuilder, attrs: RequestSpanAttributes<'_>) -> Result<Response> {
    let span = request_span(attrs);
    async {
        let response = request.send().await?;
        record_response(&Span::current(), response.status().as_u16());
        Ok(response)
    }
    .instrument(span)
    .await
}

/// Query the storage API for `path`
pub(crate) async fn fetch_status(
    session: &ArtifactorySession,
    base_uri: &str,
    path: &str,
) -> Result<Status> {
    let uri = storage_uri(base_uri, path);
    let response = send_traced(
        session.get(&uri),
        RequestSpanAttributes {
            kind: RequestKind::Storage,
            uri: &uri,
            base_uri,
            path,
            range: None,
        },
    )
    .await?;
    let response = check_status(response, &uri, path)?;
    let body = response.text().await?;
    Status::from_storage_json(&body, &uri)
}

/// Start a streaming download of the file content at `path`
pub(crate) async fn download(
    session: &ArtifactorySession,
    base_uri: &str,
    path: &str,
) -> Result<Response> {
    let uri = download_uri(base_uri, path);
    let response = send_traced(
        session.get(&uri),
        RequestSpanAttributes {
            kind: RequestKind::Download,
            uri: &uri,
            base_uri,
            path,
            range: None,
        },
    )
    .await?;
    check_status(response, &uri, path)
}

/// Download `len` bytes starting at `offset`.
///
/// Reading past the end yields fewer bytes (or none). Servers that ignore
/// the `Range` header are handled by slicing the full body.
pub(crate) async fn download_range(
    session: &ArtifactorySession,
    base_uri: &str,
    path: &str,
    offset: u64,
    len: u64,
) -> Result<Vec<u8>> {
    if len == 0 {
        return Ok(Vec::new());
    }

    let uri = download_uri(base_uri, path);
    let range = format!("bytes={}-{}", offset, offset.saturating_add(len - 1));
    let response = send_traced(
        session.get(&uri).header(RANGE, &range),
        RequestSpanAttributes {
            kind: RequestKind::RangedDownload,
            uri: &uri,
            base_uri,
            path,
            range: Some(range.clone()),
        },
    )
    .await?;

    if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
        return Ok(Vec::new());
    }
    let response = check_status(response, &uri, path)?;
    let partial = response.status() == StatusCode::PARTIAL_CONTENT;
    let body = response.bytes().await?;

    if partial {
        let end = body.len().min(usize::try_from(len).unwrap_or(usize::MAX));
        return Ok(body[..end].to_vec());
    }

    debug!(uri = %uri, "Server ignored range request, slicing full body");
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(body.len());
    let end = start
        .saturating_add(usize::try_from(len).unwrap_or(usize::MAX))
        .min(body.len());
    Ok(body[start..end].to_vec())
}
