//! Export destination settings.

pub const DEFAULT_ENDPOINT: &str = "http://localhost:4318";

/// Where spans go and under which service label they appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Collector base URL; `/v1/traces` and `/v1/metrics` are appended.
    pub endpoint: String,
    /// Value of the `service.name` resource attribute.
    pub service_name: String,
}

impl ExportConfig {
    pub fn new(endpoint: impl Into<String>, service_name: impl Into<String>) -> ExportConfig {
        ExportConfig {
            endpoint: endpoint.into(),
            service_name: service_name.into(),
        }
    }
}

/// Pick the endpoint from the highest-priority source that set one:
/// explicit flag, then `TRACESMITH_OTLP_ENDPOINT`, then the standard
/// `OTEL_EXPORTER_OTLP_ENDPOINT`, then the config file, then the default.
pub fn resolve_endpoint(flag: Option<&str>, file_value: Option<&str>) -> String {
    if let Some(endpoint) = flag {
        return endpoint.to_string();
    }
    for var in ["TRACESMITH_OTLP_ENDPOINT", "OTEL_EXPORTER_OTLP_ENDPOINT"] {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return value;
            }
        }
    }
    if let Some(endpoint) = file_value {
        return endpoint.to_string();
    }
    DEFAULT_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are deliberately not exercised here: tests run
    // in parallel and process-wide env mutation races across threads.

    #[test]
    fn flag_beats_config_file() {
        assert_eq!(
            resolve_endpoint(Some("http://flag:4318"), Some("http://file:4318")),
            "http://flag:4318"
        );
    }

    #[test]
    fn config_file_beats_default() {
        assert_eq!(
            resolve_endpoint(None, Some("http://file:4318")),
            "http://file:4318"
        );
    }

    #[test]
    fn default_when_nothing_is_set() {
        assert_eq!(resolve_endpoint(None, None), DEFAULT_ENDPOINT);
    }
}
