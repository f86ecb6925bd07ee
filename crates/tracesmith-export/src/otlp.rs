//! OTLP/JSON wire model for traces.
//!
//! One batch carries one resource, one scope, and the session's spans.
//! Field spelling and nesting follow the OTLP JSON mapping so any
//! `/v1/traces` receiver accepts the payload.

use serde::Serialize;
use tracesmith_types::{Span, SpanStatus};

const SPAN_KIND_INTERNAL: u32 = 1;
const STATUS_CODE_ERROR: u32 = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceBatch {
    resource_spans: Vec<ResourceSpans>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSpans {
    resource: Resource,
    scope_spans: Vec<ScopeSpans>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Resource {
    pub attributes: Vec<KeyValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScopeSpans {
    scope: Scope,
    spans: Vec<WireSpan>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Scope {
    pub name: &'static str,
    pub version: &'static str,
}

impl Scope {
    pub(crate) fn tracesmith() -> Scope {
        Scope {
            name: "tracesmith",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSpan {
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_span_id: Option<String>,
    name: String,
    kind: u32,
    start_time_unix_nano: String,
    end_time_unix_nano: String,
    status: WireStatus,
    attributes: Vec<KeyValue>,
}

#[derive(Debug, Serialize)]
struct WireStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeyValue {
    key: String,
    value: AttributeValue,
}

#[derive(Debug, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
enum AttributeValue {
    String { string_value: String },
    Int { int_value: i64 },
}

/// Build the export batch. Empty input means there is nothing to say and no
/// batch at all, not an empty envelope.
pub fn build_batch(service_name: &str, spans: &[Span]) -> Option<TraceBatch> {
    if spans.is_empty() {
        return None;
    }
    Some(TraceBatch {
        resource_spans: vec![ResourceSpans {
            resource: Resource {
                attributes: vec![key_value("service.name", service_name)],
            },
            scope_spans: vec![ScopeSpans {
                scope: Scope::tracesmith(),
                spans: spans.iter().map(wire_span).collect(),
            }],
        }],
    })
}

fn wire_span(span: &Span) -> WireSpan {
    WireSpan {
        trace_id: hex32(&span.trace_id),
        span_id: span.span_id.clone(),
        parent_span_id: span.parent_span_id.clone(),
        name: span.name.clone(),
        kind: SPAN_KIND_INTERNAL,
        start_time_unix_nano: span.start_ns.to_string(),
        end_time_unix_nano: span.end_ns.to_string(),
        status: WireStatus {
            code: match span.status {
                SpanStatus::Ok => None,
                SpanStatus::Error => Some(STATUS_CODE_ERROR),
            },
        },
        attributes: span
            .attributes
            .iter()
            .map(|(key, value)| key_value(key, value))
            .collect(),
    }
}

/// Attribute values that parse as integers are emitted as numbers; anything
/// else stays a string.
pub(crate) fn key_value(key: &str, value: &str) -> KeyValue {
    let value = match value.parse::<i64>() {
        Ok(int_value) => AttributeValue::Int { int_value },
        Err(_) => AttributeValue::String {
            string_value: value.to_string(),
        },
    };
    KeyValue {
        key: key.to_string(),
        value,
    }
}

/// OTLP trace ids are exactly 32 hex digits. Session-derived ids are padded
/// with zeros or truncated to fit.
fn hex32(id: &str) -> String {
    let mut out: String = id.chars().take(32).collect();
    while out.len() < 32 {
        out.push('0');
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracesmith_types::TimestampNs;

    use super::*;

    fn sample_span() -> Span {
        Span {
            trace_id: "abc123".to_string(),
            span_id: "0000000000000001".to_string(),
            parent_span_id: None,
            name: "claude.session".to_string(),
            start_ns: TimestampNs(1_705_314_600_000_000_000),
            end_ns: TimestampNs(1_705_314_660_000_000_000),
            status: SpanStatus::Ok,
            attributes: vec![
                ("session.id".to_string(), "abc-123".to_string()),
                ("tokens.input".to_string(), "1200".to_string()),
            ],
        }
    }

    #[test]
    fn empty_input_builds_no_batch() {
        assert!(build_batch("claude-code", &[]).is_none());
    }

    #[test]
    fn batch_matches_the_otlp_json_mapping() {
        let batch = build_batch("claude-code", &[sample_span()]).unwrap();
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            value,
            json!({
                "resourceSpans": [{
                    "resource": {
                        "attributes": [
                            {"key": "service.name", "value": {"stringValue": "claude-code"}}
                        ]
                    },
                    "scopeSpans": [{
                        "scope": {"name": "tracesmith", "version": env!("CARGO_PKG_VERSION")},
                        "spans": [{
                            "traceId": "abc12300000000000000000000000000",
                            "spanId": "0000000000000001",
                            "name": "claude.session",
                            "kind": 1,
                            "startTimeUnixNano": "1705314600000000000",
                            "endTimeUnixNano": "1705314660000000000",
                            "status": {},
                            "attributes": [
                                {"key": "session.id", "value": {"stringValue": "abc-123"}},
                                {"key": "tokens.input", "value": {"intValue": 1200}}
                            ]
                        }]
                    }]
                }]
            })
        );
    }

    #[test]
    fn error_status_carries_code_two() {
        let mut span = sample_span();
        span.status = SpanStatus::Error;
        span.parent_span_id = Some("0000000000000001".to_string());
        let batch = build_batch("claude-code", &[span]).unwrap();
        let value = serde_json::to_value(&batch).unwrap();
        let wire = &value["resourceSpans"][0]["scopeSpans"][0]["spans"][0];
        assert_eq!(wire["status"], json!({"code": 2}));
        assert_eq!(wire["parentSpanId"], json!("0000000000000001"));
    }

    #[test]
    fn long_trace_ids_are_truncated_to_32_digits() {
        assert_eq!(hex32("a").len(), 32);
        assert_eq!(
            hex32("0123456789abcdef0123456789abcdef00ff"),
            "0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn numeric_looking_attributes_become_numbers() {
        let kv = serde_json::to_value(key_value("tool.calls", "7")).unwrap();
        assert_eq!(kv, json!({"key": "tool.calls", "value": {"intValue": 7}}));

        let kv = serde_json::to_value(key_value("git.branch", "main")).unwrap();
        assert_eq!(
            kv,
            json!({"key": "git.branch", "value": {"stringValue": "main"}})
        );

        // Hex-ish ids with letters stay strings.
        let kv = serde_json::to_value(key_value("session.id", "0195b2c3-aa11")).unwrap();
        assert_eq!(
            kv,
            json!({"key": "session.id", "value": {"stringValue": "0195b2c3-aa11"}})
        );
    }
}
