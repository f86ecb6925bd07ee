use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracesmith_types::Provider;

/// Resolve the config file path based on priority:
/// 1. Explicit `--config` flag
/// 2. TRACESMITH_CONFIG environment variable
/// 3. `<config_dir>/tracesmith/config.toml`
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var("TRACESMITH_CONFIG") {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("tracesmith").join("config.toml"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportSection {
    pub endpoint: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSection {
    pub log_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub providers: HashMap<String, ProviderSection>,
}

impl Config {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Log root for a provider: configured value (tilde-expanded) or the
    /// provider's well-known default. None only when neither is resolvable.
    pub fn log_root_for(&self, provider: Provider) -> Option<PathBuf> {
        if let Some(section) = self.providers.get(provider.slug()) {
            if let Some(expanded) = section.log_root.to_str().map(expand_tilde) {
                return Some(expanded);
            }
            return Some(section.log_root.clone());
        }
        tracesmith_providers::default_log_root(provider)
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
