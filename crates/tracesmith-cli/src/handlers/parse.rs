use crate::types::ProviderName;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracesmith_export::build_batch;

pub fn handle(provider: Option<ProviderName>, log_file: PathBuf) -> Result<()> {
    let adapter = super::resolve_adapter(provider, &log_file)?;

    let session = adapter
        .extractor
        .extract(&log_file)
        .with_context(|| format!("failed to parse session log {}", log_file.display()))?;
    let spans = tracesmith_engine::assemble(&session.meta, &session.entries);

    let service_name = session.meta.provider.service_name();
    let Some(batch) = build_batch(service_name, &spans) else {
        return Ok(());
    };
    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
