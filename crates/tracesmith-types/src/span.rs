use serde::{Deserialize, Serialize};

use crate::time::TimestampNs;

/// Span status, mirroring the two OTLP status codes this pipeline emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    Ok,
    Error,
}

/// One synthesized span, immutable once assembled.
///
/// Attributes are an ordered list rather than a map: emission order is
/// part of the idempotence contract (re-parsing a log must produce
/// byte-identical output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// 32 lowercase hex chars.
    pub trace_id: String,
    /// 16 lowercase hex chars, unique within the trace.
    pub span_id: String,
    /// `None` only for the root span; every other span points at the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub name: String,
    pub start_ns: TimestampNs,
    pub end_ns: TimestampNs,
    pub status: SpanStatus,
    pub attributes: Vec<(String, String)>,
}

impl Span {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn duration_ns(&self) -> u64 {
        self.end_ns.0.saturating_sub(self.start_ns.0)
    }
}
