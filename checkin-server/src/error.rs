//! Error types for checkin-server startup
//!
//! Request-time failures live next to the code that produces them
//! ([`crate::db::repos::RepoError`], [`crate::http::ApiError`]). The types
//! here cover the bootstrap phase, where every failure is fatal to the caller.

use thiserror::Error;

use crate::db::GatewayError;
use crate::http::ServerError;
use crate::logging::LoggingError;

/// Required configuration is absent or unusable
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DATABASE_URL not set in environment")]
    MissingDatabaseUrl,

    /// `redacted` never carries the password
    #[error("invalid database url {redacted}: {reason}")]
    InvalidDatabaseUrl { redacted: String, reason: String },
}

/// Top-level error for the bootstrap phase
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

pub type Result<T> = std::result::Result<T, Error>;
