use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracesmith_types::Provider;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::traits::{LogDiscovery, ProbeResult};

pub struct ClaudeDiscovery;

impl LogDiscovery for ClaudeDiscovery {
    fn provider(&self) -> Provider {
        Provider::ClaudeCode
    }

    fn probe(&self, path: &Path) -> ProbeResult {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            return ProbeResult::NoMatch;
        }
        let Ok(file) = File::open(path) else {
            return ProbeResult::NoMatch;
        };
        // Claude Code record envelopes carry camelCase linkage fields no
        // other provider writes.
        for line in BufReader::new(file).lines().take(20).flatten() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.contains("\"sessionId\"")
                && (line.contains("\"parentUuid\"") || line.contains("\"isSidechain\""))
            {
                return ProbeResult::Confidence(1.0);
            }
        }
        ProbeResult::NoMatch
    }

    /// Claude Code names the log after the session id, one file per session,
    /// nested under a per-project directory.
    fn find_session_log(&self, log_root: &Path, session_id: &str) -> Result<PathBuf> {
        let needle = format!("{session_id}.jsonl");
        for entry in WalkDir::new(log_root)
            .max_depth(3)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && entry.file_name().to_string_lossy() == needle.as_str()
            {
                return Ok(entry.into_path());
            }
        }
        Err(Error::Discovery(format!(
            "no Claude Code log for session {session_id} under {}",
            log_root.display()
        )))
    }
}
