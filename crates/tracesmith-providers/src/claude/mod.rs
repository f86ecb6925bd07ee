//! Claude Code session logs.
//!
//! JSONL, one record per line, written under
//! `~/.claude/projects/<project-dir>/<session-id>.jsonl`.

mod discovery;
mod io;
mod parser;
mod schema;

pub use discovery::ClaudeDiscovery;
pub use parser::ClaudeExtractor;
