//! checkin-server: check-in registration service
//!
//! Accepts user records over HTTP, persists them in Postgres and serves
//! them back. The pieces, leaf to root:
//!
//! - [`logging`] - line formatter and sink lifecycle every event flows through
//! - [`db::Gateway`] - pooled connection with startup retry and DSN redaction
//! - [`db::repos::PgUserRepo`] - typed access to the `users` table
//! - [`health`] - liveness plus a cheap aggregate
//! - [`http`] - axum router mapping verbs/paths onto the repository

pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod http;
pub mod logging;
pub mod models;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use config::{DatabaseConfig, LoggingConfig};
pub use error::{ConfigError, Error, Result};
pub use http::ServerConfig;
pub use state::AppState;

use db::repos::PgUserRepo;
use db::{migrations, Gateway};

/// Connect to the store, apply the bootstrap schema and serve HTTP until
/// shutdown.
///
/// Every failure before the listener is bound is returned to the caller,
/// which decides whether the process terminates.
pub async fn serve(database: DatabaseConfig, server: ServerConfig) -> Result<()> {
    tracing::info!("Connecting to database...");
    let gateway = Arc::new(Gateway::connect(&database).await?);
    tracing::info!("Database connection established");

    if let Err(err) = migrations::run(&gateway).await {
        gateway.close().await;
        return Err(err.into());
    }

    let state = AppState::new(Arc::new(PgUserRepo::new(Arc::clone(&gateway))));
    let result = http::run_server(state, server).await;

    gateway.close().await;
    result.map_err(Into::into)
}

/// Apply the bootstrap schema and exit.
pub async fn migrate(database: DatabaseConfig) -> Result<()> {
    let gateway = Gateway::connect(&database).await?;
    let result = migrations::run(&gateway).await;
    gateway.close().await;
    result.map_err(Into::into)
}
