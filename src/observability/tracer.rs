//! Tracer provider whose exporter appends OTLP JSON lines to a local file.
//!
//! Plugins run in a WASI sandbox without outbound sockets of their own, so
//! spans go to disk instead of a collector.

use super::file_writer::{FileWriter, Rotation};
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Writes every exported batch as one line of OTLP JSON.
struct JsonLinesExporter {
    writer: FileWriter,
    formatter: SpanFormatter,
    stopped: AtomicBool,
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.stopped.load(Ordering::SeqCst) {
            Err(TraceError::from("trace exporter already shut down"))
        } else {
            let line = self.formatter.format_batch(&batch).to_string();
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// The resource is fixed when the formatter is built.
    fn set_resource(&mut self, _resource: &Resource) {}
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("writer", &self.writer)
            .field("formatter", &self.formatter)
            .field("stopped", &self.stopped)
            .finish()
    }
}

/// Builds a provider that exports each span as soon as it ends.
pub fn create_tracer_provider(
    file_path: PathBuf,
    rotation: Rotation,
    resource: Resource,
    scope: &'static str,
) -> TracerProvider {
    let exporter = JsonLinesExporter {
        writer: FileWriter::new(file_path, rotation),
        formatter: SpanFormatter::new(resource.clone(), scope),
        stopped: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
