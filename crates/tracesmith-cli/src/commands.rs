use crate::args::{Cli, Commands};
use crate::handlers;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            provider,
            log_file,
            session_id,
            service,
            endpoint,
            dry_run,
            payload,
        } => handlers::run::handle(
            cli.config.as_deref(),
            provider,
            log_file,
            session_id,
            service,
            endpoint,
            dry_run,
            payload,
        ),

        Commands::Parse { provider, log_file } => handlers::parse::handle(provider, log_file),

        Commands::Transmit { url } => handlers::transmit::handle(&url),
    }
}
