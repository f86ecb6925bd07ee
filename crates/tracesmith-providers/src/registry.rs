use std::path::{Path, PathBuf};

use tracesmith_types::Provider;

use crate::traits::ProviderAdapter;

/// Static description of a supported provider.
pub struct ProviderMetadata {
    pub provider: Provider,
    pub name: &'static str,
    pub description: &'static str,
    pub default_log_path: &'static str,
}

/// All providers tracesmith can read, in registration order.
pub const PROVIDERS: &[ProviderMetadata] = &[
    ProviderMetadata {
        provider: Provider::ClaudeCode,
        name: "claude",
        description: "Claude Code session logs (JSONL)",
        default_log_path: "~/.claude/projects",
    },
    ProviderMetadata {
        provider: Provider::Codex,
        name: "codex",
        description: "Codex CLI rollout logs (JSONL)",
        default_log_path: "~/.codex/sessions",
    },
    ProviderMetadata {
        provider: Provider::Gemini,
        name: "gemini",
        description: "Gemini CLI session checkpoints (JSON)",
        default_log_path: "~/.gemini/tmp",
    },
];

pub fn provider_metadata(provider: Provider) -> &'static ProviderMetadata {
    PROVIDERS
        .iter()
        .find(|m| m.provider == provider)
        .unwrap_or(&PROVIDERS[0])
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home_path(path: &str) -> Option<PathBuf> {
    if let Some(stripped) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(stripped))
    } else {
        Some(PathBuf::from(path))
    }
}

/// Default log root for a provider, resolved against the user's home.
pub fn default_log_root(provider: Provider) -> Option<PathBuf> {
    expand_home_path(provider_metadata(provider).default_log_path)
}

/// Infer which provider wrote a log file by probing it with each adapter.
pub fn detect_provider(path: &Path) -> Option<ProviderAdapter> {
    for meta in PROVIDERS {
        let adapter = ProviderAdapter::for_provider(meta.provider);
        if adapter.discovery.probe(path).match_high() {
            return Some(adapter);
        }
    }
    None
}
