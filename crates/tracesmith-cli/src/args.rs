use crate::types::{LogLevel, ProviderName};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tracesmith")]
#[command(about = "Export AI coding agent sessions as OpenTelemetry traces", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "error", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hook entry point: parse a session log, assemble spans, export them
    Run {
        #[arg(long)]
        provider: Option<ProviderName>,

        #[arg(long, help = "Session log to read (skips payload and discovery)")]
        log_file: Option<PathBuf>,

        #[arg(long, help = "Session ID for discovery when no log path is known")]
        session_id: Option<String>,

        #[arg(long, help = "Value for the service.name resource attribute")]
        service: Option<String>,

        #[arg(long, help = "Collector base URL, e.g. http://localhost:4318")]
        endpoint: Option<String>,

        #[arg(long, help = "Print the OTLP batch to stdout instead of exporting")]
        dry_run: bool,

        /// Hook payload JSON; read from stdin when absent
        payload: Option<String>,
    },

    /// Parse a session log and print the OTLP batch without exporting
    Parse {
        #[arg(long)]
        provider: Option<ProviderName>,

        log_file: PathBuf,
    },

    /// Read an OTLP payload from stdin and POST it (used by the detached sender)
    #[command(hide = true)]
    Transmit {
        #[arg(long)]
        url: String,
    },
}
