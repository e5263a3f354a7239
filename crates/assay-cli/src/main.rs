//! Assay CLI - Score contributions and allocate from the epoch ledger.

use assay_cli::commands;
use assay_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> assay_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database = Some(database);
    }
    debug!(
        config_file = ?cli.config,
        database = ?config.database,
        scoring_version = %config.scoring.version,
        "Loaded configuration"
    );

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Score(args) => commands::execute_score(args, &config, &formatter)?,
        Command::Evaluate(args) => {
            commands::execute_evaluate(args, &config, &formatter).await?
        }
        Command::Allocate(args) => commands::execute_allocate(args, &config, &formatter)?,
        Command::Ledger(args) => commands::execute_ledger(args, &config, &formatter)?,
        Command::Epoch(args) => commands::execute_epoch(args, &config, &formatter)?,
        Command::Verify(args) => commands::execute_verify(args, &config, &formatter)?,
    }

    Ok(())
}
