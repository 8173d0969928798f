//! Global subscriber setup.

use super::file_writer::Rotation;
use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "CafeConsole";

/// Trace file name inside the plugin data directory.
pub const TRACE_FILE: &str = "cafe-console-otlp.json";

/// Installs the global `tracing` subscriber: an `EnvFilter` built from
/// `trace_level` (default `info`) feeding an OpenTelemetry layer that exports
/// to [`TRACE_FILE`].
///
/// Does nothing if the data directory cannot be created or a subscriber is
/// already installed. Tracing must never keep the plugin from loading.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);
    let provider = tracer::create_tracer_provider(
        data_dir.join(TRACE_FILE),
        Rotation::default(),
        resource,
        SERVICE_NAME,
    );

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)));

    let _ = subscriber.try_init();
}
