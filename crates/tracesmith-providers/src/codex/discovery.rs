use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracesmith_types::Provider;
use walkdir::WalkDir;

use super::schema::CodexRecord;
use crate::error::{Error, Result};
use crate::traits::{LogDiscovery, ProbeResult};

pub struct CodexDiscovery;

impl LogDiscovery for CodexDiscovery {
    fn provider(&self) -> Provider {
        Provider::Codex
    }

    fn probe(&self, path: &Path) -> ProbeResult {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            return ProbeResult::NoMatch;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with("rollout-") {
            return ProbeResult::Confidence(1.0);
        }
        // Renamed copies still open with a session_meta envelope.
        if header_session_id(path).is_some() {
            return ProbeResult::Confidence(0.9);
        }
        ProbeResult::NoMatch
    }

    /// Rollout files embed the session id in the file name:
    /// `rollout-<datetime>-<session-id>.jsonl`, nested under date directories.
    fn find_session_log(&self, log_root: &Path, session_id: &str) -> Result<PathBuf> {
        let suffix = format!("-{session_id}.jsonl");
        let mut rollouts = Vec::new();
        for entry in WalkDir::new(log_root)
            .max_depth(5)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with("rollout-") || !name.ends_with(".jsonl") {
                continue;
            }
            if name.ends_with(&suffix) {
                return Ok(entry.into_path());
            }
            rollouts.push(entry.into_path());
        }
        // Filename miss: fall back to matching the session_meta header.
        for path in rollouts {
            if header_session_id(&path).as_deref() == Some(session_id) {
                return Ok(path);
            }
        }
        Err(Error::Discovery(format!(
            "no Codex rollout for session {session_id} under {}",
            log_root.display()
        )))
    }
}

fn header_session_id(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    for line in BufReader::new(file).lines().take(5).flatten() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(CodexRecord::SessionMeta(meta)) = serde_json::from_str::<CodexRecord>(line) {
            return Some(meta.payload.id);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_rollout_by_file_name_suffix() {
        let root = tempfile::tempdir().unwrap();
        let day = root.path().join("2024").join("03").join("01");
        fs::create_dir_all(&day).unwrap();
        let log = day.join("rollout-2024-03-01T08-00-00-0195b2c3-aa11.jsonl");
        fs::write(&log, "{}\n").unwrap();

        let found = CodexDiscovery
            .find_session_log(root.path(), "0195b2c3-aa11")
            .unwrap();
        assert_eq!(found, log);
    }

    #[test]
    fn falls_back_to_session_meta_header() {
        let root = tempfile::tempdir().unwrap();
        let log = root.path().join("rollout-renamed.jsonl");
        fs::write(
            &log,
            r#"{"timestamp":"2024-03-01T08:00:00Z","type":"session_meta","payload":{"id":"sess-odd"}}"#,
        )
        .unwrap();

        let found = CodexDiscovery
            .find_session_log(root.path(), "sess-odd")
            .unwrap();
        assert_eq!(found, log);
    }

    #[test]
    fn missing_session_is_a_discovery_error() {
        let root = tempfile::tempdir().unwrap();
        let err = CodexDiscovery
            .find_session_log(root.path(), "missing")
            .unwrap_err();
        assert!(matches!(err, Error::Discovery(_)));
    }

    #[test]
    fn probe_accepts_rollout_files_only() {
        let root = tempfile::tempdir().unwrap();
        let rollout = root.path().join("rollout-2024-03-01T08-00-00-x.jsonl");
        fs::write(&rollout, "{}\n").unwrap();
        assert!(CodexDiscovery.probe(&rollout).match_high());

        let other = root.path().join("notes.jsonl");
        fs::write(&other, "{}\n").unwrap();
        assert_eq!(CodexDiscovery.probe(&other), ProbeResult::NoMatch);
    }
}
