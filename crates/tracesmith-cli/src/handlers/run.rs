use crate::config::Config;
use crate::hook::{self, HookPayload};
use crate::types::ProviderName;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracesmith_export::{ExportConfig, build_batch, emit_counter, resolve_endpoint, send_spans};
use tracesmith_providers::ProviderAdapter;

#[allow(clippy::too_many_arguments)]
pub fn handle(
    config_path: Option<&Path>,
    provider: Option<ProviderName>,
    log_file: Option<PathBuf>,
    session_id: Option<String>,
    service: Option<String>,
    endpoint: Option<String>,
    dry_run: bool,
    payload: Option<String>,
) -> Result<()> {
    let config = Config::load(config_path)?;

    // The hook payload arrives as a positional argument or on stdin. Skip
    // stdin entirely when explicit flags already name the session.
    let payload = match payload {
        Some(raw) => hook::parse_payload(&raw),
        None if log_file.is_none() && session_id.is_none() => {
            let mut raw = String::new();
            let _ = std::io::stdin().read_to_string(&mut raw);
            hook::parse_payload(&raw)
        }
        None => HookPayload::default(),
    };

    let session_id = session_id.or(payload.session_id);
    let log_file = log_file.or(payload.transcript_path);

    let (adapter, log_file) = locate_session(&config, provider, log_file, session_id.as_deref())?;

    let session = adapter
        .extractor
        .extract(&log_file)
        .with_context(|| format!("failed to parse session log {}", log_file.display()))?;
    let spans = tracesmith_engine::assemble(&session.meta, &session.entries);

    let service_name = service
        .or_else(|| config.export.service_name.clone())
        .unwrap_or_else(|| session.meta.provider.service_name().to_string());
    let endpoint = resolve_endpoint(endpoint.as_deref(), config.export.endpoint.as_deref());
    let export_config = ExportConfig::new(endpoint, service_name);

    let Some(batch) = build_batch(&export_config.service_name, &spans) else {
        return Ok(());
    };

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    tracing::info!(
        session_id = %session.meta.session_id,
        spans = spans.len(),
        "exporting session"
    );
    send_spans(&export_config, &batch);
    emit_counter(
        &export_config,
        "tracesmith.sessions.exported",
        1,
        &[("provider", session.meta.provider.slug())],
    );
    Ok(())
}

/// Work out which adapter reads which file. Three ways in:
/// a known path (probe it if the provider flag is absent), a provider plus
/// session id (discovery under the configured log root), or nothing (error).
fn locate_session(
    config: &Config,
    provider: Option<ProviderName>,
    log_file: Option<PathBuf>,
    session_id: Option<&str>,
) -> Result<(ProviderAdapter, PathBuf)> {
    if let Some(path) = log_file {
        let adapter = super::resolve_adapter(provider, &path)?;
        return Ok((adapter, path));
    }

    let name = provider.context(
        "no session log known: pass --log-file, or --provider with --session-id, or a hook payload",
    )?;
    let session_id = session_id.context("no session id: pass --session-id or a hook payload")?;

    let provider = name.to_provider();
    let adapter = ProviderAdapter::for_provider(provider);
    let log_root = config.log_root_for(provider).with_context(|| {
        format!(
            "no log root known for {}; set [providers.{}] log_root in the config",
            name, name
        )
    })?;
    let path = adapter.discovery.find_session_log(&log_root, session_id)?;
    Ok((adapter, path))
}
