//! # artpath telemetry
//!
//! Structured logging and OpenTelemetry tracing for Artifactory requests.
//!
//! Library crates only emit `tracing` events and spans; binaries call
//! [`init_telemetry`] once to install a subscriber.

mod spans;
mod tracer;

pub use spans::{RequestKind, RequestSpanAttributes, record_response, request_span};
pub use tracer::{
    TelemetryOptions, init_telemetry, register_span_processor, tracer_provider,
};

/// Span attribute names for Artifactory requests.
///
/// HTTP names follow the OpenTelemetry semantic conventions.
pub mod attributes {
    pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
    pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
    pub const URL_FULL: &str = "url.full";

    pub const ARTIFACTORY_PATH: &str = "artifactory.path";
    pub const ARTIFACTORY_BASE_URI: &str = "artifactory.base_uri";
    pub const ARTIFACTORY_REQUEST_KIND: &str = "artifactory.request.kind";
    pub const ARTIFACTORY_RANGE: &str = "artifactory.range";

    // Instrumentation scope name
    pub const SYSTEM_NAME: &str = "artpath";
}
