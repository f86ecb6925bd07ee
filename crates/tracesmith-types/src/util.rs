use sha2::{Digest, Sha256};
use std::path::Path;

/// Truncate a string to a maximum number of characters.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect::<String>() + "...(truncated)"
    }
}

/// SHA256 hex digest of a project root path.
///
/// Gemini CLI buckets its per-project state under
/// `~/.gemini/tmp/<sha256(project_root)>/`, so discovery needs the same
/// digest of the same string to find a project's chat logs.
pub fn project_hash_for_root(project_root: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project_root.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}
