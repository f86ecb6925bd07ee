//! Codex CLI rollout logs.
//!
//! JSONL, one timestamped envelope per line, written under
//! `~/.codex/sessions/<year>/<month>/<day>/rollout-<datetime>-<session-id>.jsonl`.

mod discovery;
mod io;
mod parser;
mod schema;

pub use discovery::CodexDiscovery;
pub use parser::CodexExtractor;
