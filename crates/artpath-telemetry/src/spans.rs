//! Span helpers for Artifactory requests

use crate::attributes::*;
use std::fmt;
use tracing::Span;
use tracing::field::Empty;

/// What an Artifactory request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Storage API lookup (`/api/storage/...`)
    Storage,
    /// File content download
    Download,
    /// Ranged file content download
    RangedDownload,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Storage => "storage",
            RequestKind::Download => "download",
            RequestKind::RangedDownload => "ranged_download",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes for tracing an Artifactory request
#[derive(Debug, Clone)]
pub struct RequestSpanAttributes<'a> {
    pub kind: RequestKind,
    pub uri: &'a str,
    pub base_uri: &'a str,
    pub path: &'a str,
    /// `bytes=a-b` for ranged downloads
    pub range: Option<String>,
}

/// Create a span for one Artifactory request.
///
/// The response status is left empty; fill it with [`record_response`] once
/// the server answers. Instrument the request future with the returned span.
pub fn request_span(attrs: RequestSpanAttributes<'_>) -> Span {
    let span = tracing::info_span!(
        "artifactory.request",
        { HTTP_REQUEST_METHOD } = "GET",
        { URL_FULL } = %attrs.uri,
        { ARTIFACTORY_BASE_URI } = %attrs.base_uri,
        { ARTIFACTORY_PATH } = %attrs.path,
        { ARTIFACTORY_REQUEST_KIND } = %attrs.kind,
        { ARTIFACTORY_RANGE } = Empty,
        { HTTP_RESPONSE_STATUS_CODE } = Empty,
    );

    if let Some(range) = attrs.range {
        span.record(ARTIFACTORY_RANGE, range.as_str());
    }

    span
}

/// Record the HTTP status of a finished request on its span
pub fn record_response(span: &Span, status: u16) {
    span.record(HTTP_RESPONSE_STATUS_CODE, status);
}
