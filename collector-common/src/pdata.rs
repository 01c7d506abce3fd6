//! Pipeline payloads handed to exporters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A batch of spans sharing one resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traces {
    /// Resource attributes (e.g., "service.name").
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub resource: HashMap<String, String>,

    pub spans: Vec<Span>,
}

impl Traces {
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            resource: HashMap::new(),
            spans,
        }
    }

    /// Add a resource attribute to this batch.
    pub fn with_resource(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.resource.insert(key.into(), value.into());
        self
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }
}

/// A single span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub trace_id: [u8; 16],
    pub span_id: [u8; 8],
    #[serde(default)]
    pub parent_span_id: Option<[u8; 8]>,
    pub name: String,
    #[serde(default)]
    pub kind: SpanKind,
    pub start_time_unix_nano: u64,
    pub end_time_unix_nano: u64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub status: SpanStatus,
}

impl Span {
    /// Create a root span with no attributes.
    pub fn new(
        trace_id: [u8; 16],
        span_id: [u8; 8],
        name: impl Into<String>,
        start_time_unix_nano: u64,
        end_time_unix_nano: u64,
    ) -> Self {
        Self {
            trace_id,
            span_id,
            parent_span_id: None,
            name: name.into(),
            kind: SpanKind::default(),
            start_time_unix_nano,
            end_time_unix_nano,
            attributes: HashMap::new(),
            status: SpanStatus::default(),
        }
    }

    pub fn with_parent(mut self, parent_span_id: [u8; 8]) -> Self {
        self.parent_span_id = Some(parent_span_id);
        self
    }

    pub fn with_kind(mut self, kind: SpanKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_span_id.is_none()
    }

    /// Span duration in nanoseconds, zero if the end precedes the start.
    pub fn duration_nanos(&self) -> u64 {
        self.end_time_unix_nano
            .saturating_sub(self.start_time_unix_nano)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    #[default]
    Internal,
    Server,
    Client,
    Producer,
    Consumer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanStatus {
    #[default]
    Unset,
    Ok,
    Error(String),
}

/// A batch of metric data points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub data_points: Vec<DataPoint>,
}

impl Metrics {
    pub fn data_point_count(&self) -> usize {
        self.data_points.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: String,
    pub time_unix_nano: u64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

/// A batch of log records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Logs {
    pub records: Vec<LogRecord>,
}

impl Logs {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub time_unix_nano: u64,
    pub severity_text: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_creation() {
        let span = Span::new([1; 16], [2; 8], "GET /users", 1_000, 4_500)
            .with_kind(SpanKind::Server)
            .with_attribute("http.method", "GET");

        assert!(span.is_root());
        assert_eq!(span.kind, SpanKind::Server);
        assert_eq!(span.duration_nanos(), 3_500);
        assert_eq!(
            span.attributes.get("http.method"),
            Some(&"GET".to_string())
        );
    }

    #[test]
    fn test_child_span_and_negative_duration() {
        let span = Span::new([1; 16], [3; 8], "db.query", 5_000, 4_000).with_parent([2; 8]);
        assert!(!span.is_root());
        assert_eq!(span.duration_nanos(), 0);
    }

    #[test]
    fn test_traces_span_count() {
        let traces = Traces::new(vec![
            Span::new([1; 16], [1; 8], "a", 0, 1),
            Span::new([1; 16], [2; 8], "b", 0, 1).with_parent([1; 8]),
        ])
        .with_resource("service.name", "checkout");

        assert_eq!(traces.span_count(), 2);
        assert_eq!(
            traces.resource.get("service.name"),
            Some(&"checkout".to_string())
        );
    }
}
