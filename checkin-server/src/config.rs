//! Configuration for the store connection and the log sink
//!
//! Values come from the process environment (optionally populated from a
//! `.env` file by the binary). The HTTP side is configured through
//! [`crate::http::ServerConfig`].

use std::path::PathBuf;

use crate::db::{PoolLimits, RetryPolicy};
use crate::error::ConfigError;

/// Environment variable holding the connection string
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Store connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection string. Never log this directly, use [`crate::db::redact`].
    pub url: String,
    pub limits: PoolLimits,
    pub retry: RetryPolicy,
}

impl DatabaseConfig {
    /// Build from an optional connection string.
    ///
    /// There is no fallback: an absent or blank value is a
    /// [`ConfigError::MissingDatabaseUrl`].
    pub fn from_url(url: Option<String>) -> Result<Self, ConfigError> {
        let url = url
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            url,
            limits: PoolLimits::default(),
            retry: RetryPolicy::default(),
        })
    }

    /// Build from `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_url(std::env::var(DATABASE_URL_ENV).ok())
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &crate::db::redact(&self.url))
            .field("limits", &self.limits)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Log sink settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Directory for rotated log files, created on init
    pub dir: PathBuf,
    /// Default to DEBUG when `RUST_LOG` is not set
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            debug: false,
        }
    }
}
