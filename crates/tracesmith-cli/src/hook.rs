//! Hook payload parsing.
//!
//! Agent CLIs hand their hooks a JSON object whose field names differ by
//! product and version. Only two facts matter here, each probed through a
//! short fallback chain: the session id (`session_id` | `sessionId`) and
//! the log path (`transcript_path` | `transcriptPath` | `log_file`).

use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct HookPayload {
    pub session_id: Option<String>,
    pub transcript_path: Option<PathBuf>,
}

/// Read what the payload offers. Malformed or non-object input yields an
/// empty payload rather than an error: the caller has its own fallbacks.
pub fn parse_payload(raw: &str) -> HookPayload {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return HookPayload::default();
    };

    let session_id = first_string(&value, &["session_id", "sessionId"]);
    let transcript_path = first_string(&value, &["transcript_path", "transcriptPath", "log_file"])
        .map(PathBuf::from);

    HookPayload {
        session_id,
        transcript_path,
    }
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
