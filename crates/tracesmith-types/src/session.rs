use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;

/// Which CLI produced a session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    ClaudeCode,
    Codex,
    Gemini,
}

impl Provider {
    /// Short identifier used as the span-name prefix.
    pub fn slug(self) -> &'static str {
        match self {
            Provider::ClaudeCode => "claude",
            Provider::Codex => "codex",
            Provider::Gemini => "gemini",
        }
    }

    /// Default service label attached to exported traces.
    pub fn service_name(self) -> &'static str {
        match self {
            Provider::ClaudeCode => "claude-code",
            Provider::Codex => "codex-cli",
            Provider::Gemini => "gemini-cli",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Session-level metadata, each field taken from the first record that
/// exposes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub session_id: String,
    pub provider: Provider,
    /// First real model label seen. Placeholder values the provider emits
    /// before a model responds are skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_repo: Option<String>,
}

/// Token counters for one usage report.
///
/// `None` means the provider never reported that category; absent
/// categories must not surface as attributes downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTotals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_read: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_write: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<u64>,
}

impl TokenTotals {
    pub fn is_empty(&self) -> bool {
        self.input.is_none()
            && self.output.is_none()
            && self.cache_read.is_none()
            && self.cache_write.is_none()
            && self.reasoning.is_none()
    }

    /// Fold another report into this one. A category becomes present as
    /// soon as either side reports it; categories neither side reports
    /// stay absent.
    pub fn accumulate(&mut self, other: &TokenTotals) {
        fn fold(slot: &mut Option<u64>, add: Option<u64>) {
            if let Some(v) = add {
                *slot = Some(slot.unwrap_or(0) + v);
            }
        }
        fold(&mut self.input, other.input);
        fold(&mut self.output, other.output);
        fold(&mut self.cache_read, other.cache_read);
        fold(&mut self.cache_write, other.cache_write);
        fold(&mut self.reasoning, other.reasoning);
    }
}

/// A fully parsed session: metadata plus the normalized entry sequence,
/// transient state scoped to one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSession {
    pub meta: SessionMeta,
    pub entries: Vec<LogEntry>,
}
