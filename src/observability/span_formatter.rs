//! JSON-lines rendering of finished spans.
//!
//! Each span becomes one self-contained object:
//!
//! ```json
//! {"service":"movie-mania","traceId":"…","spanId":"…","parentSpanId":null,
//!  "name":"api_search","kind":"internal","start":"2024-05-01T10:00:00.000000Z",
//!  "durationUs":1520,"status":"ok","attributes":{"query":"heat","page":1},"events":[]}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{Event, SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde_json::{json, Map, Value as JsonValue};
use std::time::SystemTime;

pub struct SpanFormatter {
    service: String,
}

impl SpanFormatter {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Renders a batch as one JSON string per span.
    pub fn format_batch(&self, batch: &[SpanData]) -> Vec<String> {
        batch.iter().map(|span| self.format_span(span).to_string()).collect()
    }

    fn format_span(&self, span: &SpanData) -> JsonValue {
        let parent = (span.parent_span_id != SpanId::INVALID).then(|| format!("{:016x}", span.parent_span_id));
        let duration_us = span
            .end_time
            .duration_since(span.start_time)
            .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX));

        json!({
            "service": self.service,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": parent,
            "name": span.name,
            "kind": kind_name(&span.span_kind),
            "start": timestamp(span.start_time),
            "durationUs": duration_us,
            "status": status_value(&span.status),
            "attributes": attributes(&span.attributes),
            "events": span.events.iter().map(event_value).collect::<Vec<_>>(),
        })
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter").field("service", &self.service).finish()
    }
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn status_value(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    }
}

fn attributes(attrs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attrs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

fn event_value(event: &Event) -> JsonValue {
    json!({
        "name": event.name,
        "time": timestamp(event.timestamp),
        "attributes": attributes(&event.attributes),
    })
}
