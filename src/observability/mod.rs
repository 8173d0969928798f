//! Tracing export to a local OTLP JSON file.
//!
//! ```text
//! tracing spans ─▶ tracing-opentelemetry ─▶ SDK provider ─▶ JsonLinesExporter ─▶ file
//! ```
//!
//! Traces land in `~/.local/share/zellij/cafe-console/cafe-console-otlp.json`,
//! rotated at 10 MB with 3 backups. The level comes from the `trace_level`
//! plugin setting (an `EnvFilter` directive, default `info`).
//!
//! # Modules
//!
//! - [`init`]: Subscriber installation
//! - [`tracer`]: Tracer provider with the file exporter
//! - [`span_formatter`]: OTLP JSON encoding
//! - [`file_writer`]: Size-rotated JSON-lines file

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::{FileWriter, Rotation};
pub use init::{init_tracing, TRACE_FILE};
