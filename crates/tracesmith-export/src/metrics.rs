//! Minimal OTLP/JSON counter emission.
//!
//! A single monotonic sum with one data point, delivered through the same
//! detached transmitter as traces. Used for operational counts (sessions
//! exported, sessions skipped), never for anything the trace itself
//! already says.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::config::ExportConfig;
use crate::otlp::{KeyValue, Resource, Scope, key_value};
use crate::sender::spawn_transmitter;

const AGGREGATION_TEMPORALITY_CUMULATIVE: u32 = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBatch {
    resource_metrics: Vec<ResourceMetrics>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceMetrics {
    resource: Resource,
    scope_metrics: Vec<ScopeMetrics>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScopeMetrics {
    scope: Scope,
    metrics: Vec<Metric>,
}

#[derive(Debug, Serialize)]
struct Metric {
    name: String,
    sum: Sum,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Sum {
    aggregation_temporality: u32,
    is_monotonic: bool,
    data_points: Vec<DataPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DataPoint {
    as_int: String,
    time_unix_nano: String,
    attributes: Vec<KeyValue>,
}

/// Send a one-datapoint counter to `{endpoint}/v1/metrics`, detached.
/// Failures are swallowed just like span delivery.
pub fn emit_counter(config: &ExportConfig, name: &str, value: u64, labels: &[(&str, &str)]) {
    let batch = build_counter(&config.service_name, name, value, labels, now_unix_nano());
    let Ok(body) = serde_json::to_string(&batch) else {
        return;
    };
    spawn_transmitter(&metrics_url(&config.endpoint), &body);
}

fn build_counter(
    service_name: &str,
    name: &str,
    value: u64,
    labels: &[(&str, &str)],
    time_unix_nano: u64,
) -> MetricsBatch {
    MetricsBatch {
        resource_metrics: vec![ResourceMetrics {
            resource: Resource {
                attributes: vec![key_value("service.name", service_name)],
            },
            scope_metrics: vec![ScopeMetrics {
                scope: Scope::tracesmith(),
                metrics: vec![Metric {
                    name: name.to_string(),
                    sum: Sum {
                        aggregation_temporality: AGGREGATION_TEMPORALITY_CUMULATIVE,
                        is_monotonic: true,
                        data_points: vec![DataPoint {
                            as_int: value.to_string(),
                            time_unix_nano: time_unix_nano.to_string(),
                            attributes: labels
                                .iter()
                                .map(|(key, value)| key_value(key, value))
                                .collect(),
                        }],
                    },
                }],
            }],
        }],
    }
}

fn metrics_url(endpoint: &str) -> String {
    format!("{}/v1/metrics", endpoint.trim_end_matches('/'))
}

fn now_unix_nano() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}
