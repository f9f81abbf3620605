//! Subcommand implementations

pub mod migrate;
pub mod serve;

use anyhow::{Context, Result};
use checkin_server::DatabaseConfig;
use clap::Args;

/// Store connection arguments shared by every subcommand
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    /// No fallback: a missing URL is fatal.
    pub fn into_config(self) -> Result<DatabaseConfig> {
        DatabaseConfig::from_url(self.database_url)
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")
    }
}
