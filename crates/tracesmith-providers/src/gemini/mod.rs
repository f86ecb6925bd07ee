//! Gemini CLI session checkpoints.
//!
//! One JSON document per session, written under
//! `~/.gemini/tmp/<sha256(project-root)>/chats/session-<datetime>.json`.

mod discovery;
mod io;
mod parser;
mod schema;

pub use discovery::GeminiDiscovery;
pub use parser::GeminiExtractor;
