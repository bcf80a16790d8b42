//! Stride CLI - offline-first productivity from the terminal
//!
//! Every command writes to the local database first; when the profile has a
//! remote backend configured, queued changes are replayed before the process
//! exits.

use std::env;
use std::path::PathBuf;

use clap::Parser;

mod cli;
mod commands;
mod error;
mod profile;

#[cfg(test)]
mod tests;

use cli::{Cli, Commands};
use error::CliError;
use profile::CliProfile;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stride=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let profile = CliProfile::load()?;

    match cli.command {
        Commands::Task { command } => commands::task::run(command, &db_path, &profile).await,
        Commands::Note { command } => commands::note::run(command, &db_path, &profile).await,
        Commands::Expense { command } => commands::expense::run(command, &db_path, &profile).await,
        Commands::Habit { command } => commands::habit::run(command, &db_path, &profile).await,
        Commands::Status { json } => commands::status::run(json, &db_path, &profile).await,
        Commands::Sync => commands::sync::run(&db_path, &profile).await,
        Commands::Config { command } => commands::config_cmd::run(command),
    }
}

fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("STRIDE_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stride")
        .join("stride.db")
}
