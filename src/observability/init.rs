//! Subscriber setup: filter, OpenTelemetry span export, optional stderr output.

use super::tracer;
use crate::infrastructure::get_data_dir;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "movie-mania";

/// Span export file inside the data directory.
pub const SPAN_FILE_NAME: &str = "movie-mania-spans.jsonl";

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG`, then `config.trace_level`, then `info`.
/// Spans are exported to [`SPAN_FILE_NAME`] in the data directory; when
/// `with_stderr` is set, formatted events are also written to stderr.
///
/// Only the first call in a process takes effect. If the data directory cannot
/// be created, span export is skipped and the stderr layer (if requested) is
/// still installed.
pub fn init_tracing(config: &Config, with_stderr: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(resolve_level(config.trace_level.as_deref())));

    let stderr_layer = with_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let data_dir = get_data_dir(config.data_dir.as_deref());
    let otel_layer = match std::fs::create_dir_all(&data_dir) {
        Ok(()) => {
            let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);
            let provider = tracer::create_tracer_provider(data_dir.join(SPAN_FILE_NAME), SERVICE_NAME, resource);
            let tracer = provider.tracer(SERVICE_NAME);
            opentelemetry::global::set_tracer_provider(provider);
            Some(OpenTelemetryLayer::new(tracer))
        }
        Err(_) => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(stderr_layer)
        .try_init();
}

/// Flushes and shuts down the span exporter installed by [`init_tracing`].
pub fn shutdown_tracing() {
    opentelemetry::global::shutdown_tracer_provider();
}

fn resolve_level(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or("info")
        .to_string()
}
