//! Bootstrap schema, applied once at startup
//!
//! The script is idempotent (`IF NOT EXISTS` throughout) so it runs on
//! every start. Failure to apply it is fatal to the caller.

use super::{Gateway, GatewayError};

/// `users` table and its ordering index
pub const BOOTSTRAP_SQL: &str = include_str!("../../migrations/001_create_users.sql");

/// Apply [`BOOTSTRAP_SQL`].
pub async fn run(gateway: &Gateway) -> Result<(), GatewayError> {
    tracing::info!("Running database migrations...");

    if let Err(err) = gateway.execute_script(BOOTSTRAP_SQL).await {
        tracing::error!(error = %err, "Failed to execute migration");
        return Err(err);
    }

    tracing::info!("Migrations completed successfully");
    Ok(())
}
