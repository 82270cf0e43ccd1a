//! Datasmith - terminal client for a streaming data-generation service.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use datasmith_core::logging::{default_log_dir, init_logging, LogConfig};
use datasmith_core::ClientConfig;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging first, before anything can fail interestingly.
    let mut log_config = LogConfig::new(default_log_dir());
    if let Some(filter) = &cli.log_filter {
        log_config = log_config.with_filter(filter);
    }
    let _logging_guard = init_logging(log_config);

    tracing::debug!(endpoint = %cli.endpoint, "Starting datasmith");
    let config = ClientConfig::new(&cli.endpoint);

    match cli.command {
        Command::Preview { generate, capacity } => {
            let config = config.with_preview_capacity(capacity);
            commands::preview::run(&config, generate.into_request()?).await
        }
        Command::Export { generate, format, output } => {
            commands::export::run(&config, generate.into_request()?, format, output).await
        }
        Command::Download { generate, format, dir } => {
            commands::download::run(&config, generate.into_request()?, format, dir).await
        }
        Command::Batch { generate } => {
            commands::batch::run(&config, generate.into_request()?).await
        }
    }
}
