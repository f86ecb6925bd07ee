use crate::types::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber: stderr only, quiet unless asked.
/// `RUST_LOG` overrides the `--log-level` flag when set.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
