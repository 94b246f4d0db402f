use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io;

use studycopilot::app::{run_ask, run_ingest, run_upload};
use studycopilot::{run_repl_mode, setup_from_cli, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        clap_complete::generate(shell, &mut Cli::command(), "studycopilot-cli", &mut io::stdout());
        return Ok(());
    }

    let app_config = setup_from_cli(&cli)?;
    let config = &app_config.client_config;

    match &cli.command {
        Some(Commands::Ask { text, pretty }) => run_ask(config, text, *pretty).await,
        Some(Commands::Upload { path }) => run_upload(config, path).await,
        Some(Commands::Ingest { url }) => run_ingest(config, url).await,
        None => run_repl_mode(config).await,
    }
}
