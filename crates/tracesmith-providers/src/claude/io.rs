use std::path::Path;

use super::schema::ClaudeRecord;
use crate::error::Result;

/// Substring used to drop snapshot lines before JSON parsing. Snapshot
/// records routinely run to megabytes, so skipping the parse matters.
const SNAPSHOT_MARKER: &str = "\"type\":\"file-history-snapshot\"";

/// Read a Claude Code JSONL log, skipping blank, snapshot, and malformed
/// lines. Fails only when the file itself cannot be read.
pub(crate) fn read_claude_records(path: &Path) -> Result<Vec<ClaudeRecord>> {
    let text = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.contains(SNAPSHOT_MARKER) {
            continue;
        }
        match serde_json::from_str::<ClaudeRecord>(line) {
            Ok(ClaudeRecord::FileHistorySnapshot) => {}
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::debug!(line = line_no + 1, %err, "skipping malformed record");
            }
        }
    }
    Ok(records)
}
