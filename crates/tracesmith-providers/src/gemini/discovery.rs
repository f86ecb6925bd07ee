use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracesmith_types::{Provider, project_hash_for_root};
use walkdir::WalkDir;

use super::schema::LegacyGeminiMessage;
use crate::error::{Error, Result};
use crate::traits::{LogDiscovery, ProbeResult};

pub struct GeminiDiscovery;

/// Just enough of the checkpoint to identify it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionHeader {
    session_id: String,
}

impl LogDiscovery for GeminiDiscovery {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn probe(&self, path: &Path) -> ProbeResult {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            return ProbeResult::NoMatch;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with("session-") {
            return ProbeResult::Confidence(1.0);
        }
        if file_session_id(path).is_some() {
            return ProbeResult::Confidence(0.9);
        }
        ProbeResult::NoMatch
    }

    /// Checkpoints live under `<log_root>/<sha256(project-root)>/chats/`.
    /// The current directory's bucket is the likely home, so it is scanned
    /// before the full walk.
    fn find_session_log(&self, log_root: &Path, session_id: &str) -> Result<PathBuf> {
        if let Ok(cwd) = std::env::current_dir() {
            let chats = log_root.join(project_hash_for_root(&cwd)).join("chats");
            if let Some(found) = scan_dir_for_session(&chats, session_id) {
                return Ok(found);
            }
        }
        for entry in WalkDir::new(log_root)
            .max_depth(3)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file()
                && is_chat_file(&entry.file_name().to_string_lossy())
                && file_session_id(entry.path()).as_deref() == Some(session_id)
            {
                return Ok(entry.into_path());
            }
        }
        Err(Error::Discovery(format!(
            "no Gemini checkpoint for session {session_id} under {}",
            log_root.display()
        )))
    }
}

fn is_chat_file(name: &str) -> bool {
    name.starts_with("session-") && name.ends_with(".json")
}

fn scan_dir_for_session(dir: &Path, session_id: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_chat_file(&name) && file_session_id(&path).as_deref() == Some(session_id) {
            return Some(path);
        }
    }
    None
}

fn file_session_id(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    if text.trim_start().starts_with('[') {
        let messages: Vec<LegacyGeminiMessage> = serde_json::from_str(&text).ok()?;
        return messages.into_iter().find_map(|m| m.session_id);
    }
    serde_json::from_str::<SessionHeader>(&text)
        .ok()
        .map(|h| h.session_id)
}
