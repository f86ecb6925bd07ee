use std::path::{Path, PathBuf};

use tracesmith_types::{NormalizedSession, Provider};

use crate::error::Result;

/// Outcome of probing a file to decide whether a provider recognizes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeResult {
    /// Provider recognizes the file with the given confidence (0.0 to 1.0).
    Confidence(f32),
    /// Provider does not recognize the file.
    NoMatch,
}

impl ProbeResult {
    /// True when the probe is confident enough to commit to this provider.
    pub fn match_high(&self) -> bool {
        matches!(self, ProbeResult::Confidence(c) if *c > 0.8)
    }
}

/// Parses one provider's session logs into the normalized session model.
pub trait SessionExtractor: Send + Sync {
    fn provider(&self) -> Provider;

    /// Parse a session log file end to end.
    ///
    /// Fails when the file cannot be read or when no session id can be
    /// recovered from it. Individually malformed records degrade the result
    /// instead of failing it.
    fn extract(&self, path: &Path) -> Result<NormalizedSession>;
}

/// Locates one provider's session logs on disk.
pub trait LogDiscovery: Send + Sync {
    fn provider(&self) -> Provider;

    /// Cheap structural check: does this file look like one of ours?
    fn probe(&self, path: &Path) -> ProbeResult;

    /// Find the log file for a session id under the given log root.
    fn find_session_log(&self, log_root: &Path, session_id: &str) -> Result<PathBuf>;
}

/// Bundles one provider's extractor and discovery behind a single handle.
pub struct ProviderAdapter {
    pub extractor: Box<dyn SessionExtractor>,
    pub discovery: Box<dyn LogDiscovery>,
}

impl ProviderAdapter {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::ClaudeCode => Self::claude(),
            Provider::Codex => Self::codex(),
            Provider::Gemini => Self::gemini(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "claude" | "claude_code" => Some(Self::claude()),
            "codex" => Some(Self::codex()),
            "gemini" => Some(Self::gemini()),
            _ => None,
        }
    }

    pub fn claude() -> Self {
        ProviderAdapter {
            extractor: Box::new(crate::claude::ClaudeExtractor),
            discovery: Box::new(crate::claude::ClaudeDiscovery),
        }
    }

    pub fn codex() -> Self {
        ProviderAdapter {
            extractor: Box::new(crate::codex::CodexExtractor),
            discovery: Box::new(crate::codex::CodexDiscovery),
        }
    }

    pub fn gemini() -> Self {
        ProviderAdapter {
            extractor: Box::new(crate::gemini::GeminiExtractor),
            discovery: Box::new(crate::gemini::GeminiDiscovery),
        }
    }

    pub fn provider(&self) -> Provider {
        self.extractor.provider()
    }

    /// Locate and parse the log for a session id in one step.
    pub fn process_session(&self, log_root: &Path, session_id: &str) -> Result<NormalizedSession> {
        let path = self.discovery.find_session_log(log_root, session_id)?;
        self.extractor.extract(&path)
    }
}
