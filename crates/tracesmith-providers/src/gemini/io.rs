use std::path::Path;

use super::schema::{GeminiSession, LegacyGeminiMessage};
use crate::error::Result;

#[derive(Debug)]
pub(crate) enum GeminiLog {
    Session(GeminiSession),
    Legacy(Vec<LegacyGeminiMessage>),
}

/// Read a Gemini checkpoint. The current format is a session document; early
/// CLI versions wrote a bare message array, detected by the leading token.
pub(crate) fn read_gemini_log(path: &Path) -> Result<GeminiLog> {
    let text = std::fs::read_to_string(path)?;
    if text.trim_start().starts_with('[') {
        let messages = serde_json::from_str(&text)?;
        return Ok(GeminiLog::Legacy(messages));
    }
    let session = serde_json::from_str(&text)?;
    Ok(GeminiLog::Session(session))
}
