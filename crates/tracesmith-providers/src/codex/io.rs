use std::path::Path;

use super::schema::CodexRecord;
use crate::error::Result;

/// Read a Codex rollout JSONL log, skipping blank and malformed lines.
pub(crate) fn read_codex_records(path: &Path) -> Result<Vec<CodexRecord>> {
    let text = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<CodexRecord>(line) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::debug!(line = line_no + 1, %err, "skipping malformed record");
            }
        }
    }
    Ok(records)
}
