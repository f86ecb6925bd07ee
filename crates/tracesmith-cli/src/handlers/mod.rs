pub mod parse;
pub mod run;
pub mod transmit;

use crate::types::ProviderName;
use anyhow::{Context, Result};
use std::path::Path;
use tracesmith_providers::{ProviderAdapter, detect_provider};

/// An explicit `--provider` flag wins; otherwise probe the log file.
pub(crate) fn resolve_adapter(
    provider: Option<ProviderName>,
    log_file: &Path,
) -> Result<ProviderAdapter> {
    match provider {
        Some(name) => Ok(ProviderAdapter::for_provider(name.to_provider())),
        None => detect_provider(log_file).with_context(|| {
            format!(
                "cannot identify the provider for {}; pass --provider",
                log_file.display()
            )
        }),
    }
}
