//! Schema bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database = args.database.into_config()?;
    checkin_server::migrate(database)
        .await
        .context("Migration failed")
}
