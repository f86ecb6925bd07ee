//! Fire-and-forget span delivery.
//!
//! The hook process must exit the instant its work is done, so the HTTP
//! round trip runs in a detached child process re-invoking the current
//! binary's hidden `transmit` subcommand. The payload travels over the
//! child's stdin. Nothing here blocks and nothing here fails loudly: a
//! session trace is telemetry, not state.

use std::io::Write;
use std::process::{Command, Stdio};

use tracesmith_types::Span;

use crate::config::ExportConfig;
use crate::otlp::{TraceBatch, build_batch};

/// Serialize a prebuilt batch and hand it to a detached transmitter.
/// All failures are swallowed.
pub fn send_spans(config: &ExportConfig, batch: &TraceBatch) {
    let body = match serde_json::to_string(batch) {
        Ok(body) => body,
        Err(err) => {
            tracing::debug!(%err, "dropping batch that failed to serialize");
            return;
        }
    };
    spawn_transmitter(&traces_url(&config.endpoint), &body);
}

/// Build and send in one step. Empty input is a no-op.
pub fn export_spans(config: &ExportConfig, spans: &[Span]) {
    if let Some(batch) = build_batch(&config.service_name, spans) {
        send_spans(config, &batch);
    }
}

pub(crate) fn traces_url(endpoint: &str) -> String {
    format!("{}/v1/traces", endpoint.trim_end_matches('/'))
}

/// Launch `tracesmith transmit --url <url>` detached from this process,
/// write the payload to its stdin, and walk away without waiting.
pub(crate) fn spawn_transmitter(url: &str, body: &str) {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(err) => {
            tracing::debug!(%err, "cannot locate own executable, dropping payload");
            return;
        }
    };

    let mut command = Command::new(exe);
    command
        .arg("transmit")
        .arg("--url")
        .arg(url)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::debug!(%err, "transmitter failed to spawn, dropping payload");
            return;
        }
    };
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(err) = stdin.write_all(body.as_bytes()) {
            tracing::debug!(%err, "transmitter stdin closed early");
        }
    }
    // Dropping the handle leaves the child to finish on its own.
    drop(child);
}
