//! Tracer setup and management

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{SimpleSpanProcessor, TracerProvider};
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Global tracer provider holder
static TRACER_PROVIDER: OnceLock<Arc<TracerProvider>> = OnceLock::new();

/// Global span processor builders (registered before initialization)
type ProcessorBuilder = Box<dyn FnOnce() -> SimpleSpanProcessor + Send>;
static SPAN_PROCESSOR_BUILDERS: Mutex<Option<Vec<ProcessorBuilder>>> = Mutex::new(Some(Vec::new()));

/// Logging options for [`init_telemetry`]
#[derive(Debug, Clone)]
pub struct TelemetryOptions {
    /// Emit JSON lines instead of human readable output
    pub json_logs: bool,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl TelemetryOptions {
    pub fn new(json_logs: bool, log_filter: impl Into<String>) -> Self {
        Self {
            json_logs,
            log_filter: log_filter.into(),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for TelemetryOptions {
    fn default() -> Self {
        Self::new(false, "info")
    }
}

/// Register a custom span processor builder to be used when telemetry is initialized.
///
/// Lets an exporter (OTLP, Jaeger, a test collector) receive the
/// `artifactory.request` spans. Must be called BEFORE [`init_telemetry`].
///
/// # Example
///
/// ```ignore
/// use artpath_telemetry::{register_span_processor, init_telemetry, TelemetryOptions};
/// use opentelemetry_sdk::trace::SimpleSpanProcessor;
///
/// register_span_processor(Box::new(|| {
///     SimpleSpanProcessor::new(Box::new(/* your exporter */))
/// }));
/// init_telemetry(&TelemetryOptions::default())?;
/// ```
pub fn register_span_processor(builder: ProcessorBuilder) {
    let mut builders = match SPAN_PROCESSOR_BUILDERS.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if let Some(ref mut vec) = *builders {
        vec.push(builder);
    } else {
        tracing::warn!("Attempted to register span processor after telemetry initialization");
    }
}

/// Initialize logging and OpenTelemetry tracing.
///
/// Sets up a tracer provider with any registered span processors, a
/// `tracing-opentelemetry` layer, and a `fmt` layer (plain or JSON) filtered
/// by `RUST_LOG` or `options.log_filter`. Fails if a global subscriber is
/// already installed.
///
/// # Example
///
/// ```rust,no_run
/// use artpath_telemetry::{init_telemetry, TelemetryOptions};
///
/// init_telemetry(&TelemetryOptions::new(true, "artpath=debug")).unwrap();
/// ```
pub fn init_telemetry(options: &TelemetryOptions) -> Result<(), TryInitError> {
    // Take the span processor builders (can only initialize once)
    let builders = match SPAN_PROCESSOR_BUILDERS.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
    .unwrap_or_default();

    let mut provider_builder = TracerProvider::builder();
    for builder in builders {
        provider_builder = provider_builder.with_span_processor(builder());
    }
    let tracer_provider = provider_builder.build();
    let tracer = tracer_provider.tracer(crate::attributes::SYSTEM_NAME);
    let _ = TRACER_PROVIDER.set(Arc::new(tracer_provider));

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let json_layer = options.json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
    });
    let plain_layer = (!options.json_logs).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(json_layer)
        .with(plain_layer)
        .with(options.env_filter())
        .try_init()
}

/// Get the global tracer provider if initialized
pub fn tracer_provider() -> Option<Arc<TracerProvider>> {
    TRACER_PROVIDER.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TelemetryOptions::default();
        assert!(!options.json_logs);
        assert_eq!(options.log_filter, "info");
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        // Must not panic on a malformed directive
        let options = TelemetryOptions::new(false, "[[[not a filter");
        let _ = options.env_filter();
    }
}
