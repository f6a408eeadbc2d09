//! Tracer provider backed by a file exporter.

use super::file_writer::FileWriter;
use super::span_formatter::SpanFormatter;
use futures_util::future::{ready, BoxFuture};
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Writes every exported batch to the rotating span file.
struct FileSpanExporter {
    writer: FileWriter,
    formatter: SpanFormatter,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, service: &str) -> Self {
        Self {
            writer: FileWriter::new(file_path),
            formatter: SpanFormatter::new(service),
            is_shutdown: AtomicBool::new(false),
        }
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(ready(Err(TraceError::from("span exporter is shut down"))));
        }
        if batch.is_empty() {
            return Box::pin(ready(Ok(())));
        }

        let lines = self.formatter.format_batch(&batch);
        let result = self
            .writer
            .write_lines(&lines)
            .map_err(|e| TraceError::from(format!("{}: {e}", self.writer.path().display())));
        Box::pin(ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("formatter", &self.formatter)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Builds a provider that exports each span to `file_path` as soon as it ends.
pub fn create_tracer_provider(file_path: PathBuf, service: &str, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, service);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
