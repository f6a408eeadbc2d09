//! Tracing subscriber with file-based span export.
//!
//! ```text
//! tracing spans → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → movie-mania-spans.jsonl
//! ```
//!
//! - One JSON object per finished span, appended to `movie-mania-spans.jsonl`
//!   in the data directory
//! - The file rotates at 10 MB, keeping 3 backups (`.1` newest)
//! - Filter: `RUST_LOG`, then the `trace_level` option, then `info`
//! - The binary adds a compact stderr layer for events
//!
//! # Modules
//!
//! - [`init`]: Subscriber installation and shutdown
//! - `tracer`: Tracer provider wired to the file exporter
//! - `span_formatter`: Span to JSON-line rendering
//! - `file_writer`: Size-rotated writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, shutdown_tracing, SPAN_FILE_NAME};
