//! checkin CLI - process wiring for the check-in registration service
//!
//! Loads `.env`, sets up logging, then hands off to a subcommand:
//! - `serve`: connect, bootstrap the schema and serve HTTP
//! - `migrate`: apply the bootstrap schema and exit
//!
//! Any startup failure ends the process with a non-zero exit code.

use std::path::PathBuf;

use anyhow::{Context, Result};
use checkin_server::{logging, LoggingConfig};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "checkin",
    author,
    version,
    about = "Check-in registration service: accepts user records over HTTP and stores them in Postgres"
)]
struct Cli {
    /// Log at DEBUG unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    debug: bool,

    /// Directory for rotated log files
    #[arg(long, global = true, env = "CHECKIN_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Apply the bootstrap schema and exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so .env values can feed `env = ...` arguments.
    let env_file = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_guard = logging::init(&LoggingConfig {
        dir: cli.log_dir.clone(),
        debug: cli.debug,
    })
    .context("Failed to initialize logger")?;

    tracing::info!("Starting checkin...");
    match &env_file {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env file"),
        Err(_) => tracing::warn!("No .env file found, using system environment variables"),
    }

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::Migrate(args) => commands::migrate::run_migrate(args).await,
    };

    if let Err(err) = &result {
        let message = format!("{err:#}");
        tracing::error!(error = %message, "Exiting after fatal error");
    }

    logging::close(log_guard);
    result
}
