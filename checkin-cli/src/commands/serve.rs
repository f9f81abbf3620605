//! HTTP server command

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use checkin_server::ServerConfig;
use clap::Parser;

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CHECKIN_BIND", default_value = "0.0.0.0:8090")]
    pub bind: SocketAddr,

    /// Directory served for non-API paths
    #[arg(long, env = "CHECKIN_STATIC_DIR", default_value = "web/static")]
    pub static_dir: PathBuf,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database = args.database.into_config()?;

    let config = ServerConfig {
        bind_addr: args.bind,
        static_dir: args.static_dir,
        ..ServerConfig::default()
    };

    tracing::info!("Starting server on {}", config.bind_addr);
    checkin_server::serve(database, config)
        .await
        .context("Server error")
}
