//! Database gateway - owns the Postgres pool
//!
//! Startup is a distinct phase: [`Gateway::connect`] pings the store under a
//! [`RetryPolicy`] and returns an error once attempts are exhausted. It never
//! exits the process; the caller decides.
//!
//! After startup the pool is handed to repositories through
//! [`Gateway::pool`]. It is a plain sqlx executor, so exec, query and
//! single-row query are `sqlx::query(..).execute(pool)`, `.fetch_all(pool)`
//! and `.fetch_one(pool)` / `.fetch_optional(pool)`. Query errors go back to
//! the caller untouched.
//!
//! [`Gateway::ping`] is one bounded round-trip, never a wait on the pool
//! queue, so a refused connection surfaces as the driver's I/O error.

use std::future::Future;
use std::io;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions};
use sqlx::{Connection, PgPool};
use thiserror::Error;

use super::redact;
use crate::config::DatabaseConfig;
use crate::error::ConfigError;

/// Upper bound on open connections; excess callers queue for a slot
pub const MAX_OPEN_CONNECTIONS: u32 = 25;

/// Connections are recycled after this long regardless of use
pub const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Idle connections above the minimum are reaped after this long
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// How long a queued caller waits for a connection before failing
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a single liveness round-trip
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool sizing and recycling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub max_open: u32,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_open: MAX_OPEN_CONNECTIONS,
            idle_timeout: IDLE_TIMEOUT,
            max_lifetime: MAX_CONNECTION_LIFETIME,
            acquire_timeout: ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolLimits {
    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_open)
            .min_connections(0)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Fixed-delay retry for the startup liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Sleep between tries
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or the attempts run out.
    ///
    /// `op` receives the 1-based attempt number. The last error is returned.
    /// There is no sleep after the final attempt.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= attempts => return Err(err),
                Err(_) => {
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database unreachable after {attempts} attempts: {source}")]
    Connectivity {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to execute script: {0}")]
    Script(#[source] sqlx::Error),
}

/// Sole owner of the connection pool
#[derive(Debug)]
pub struct Gateway {
    pool: PgPool,
}

impl Gateway {
    /// Build the pool and wait for the store to answer a ping.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Config`] when the URL does not parse
    /// - [`GatewayError::Connectivity`] when every ping attempt failed
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, GatewayError> {
        let redacted = redact(&config.url);
        tracing::info!(dsn = %redacted, "Connecting to database");

        let options = PgConnectOptions::from_str(&config.url).map_err(|err| {
            ConfigError::InvalidDatabaseUrl {
                redacted: redacted.clone(),
                reason: err.to_string(),
            }
        })?;

        let gateway = Self {
            pool: config.limits.pool_options().connect_lazy_with(options),
        };

        let attempts = config.retry.attempts.max(1);
        let probe = config
            .retry
            .run(|attempt| {
                let gateway = &gateway;
                async move {
                    gateway.ping().await.inspect_err(|err| {
                        tracing::warn!(
                            attempt,
                            max_retries = attempts,
                            error = %err,
                            "Database ping failed"
                        );
                    })
                }
            })
            .await;

        match probe {
            Ok(()) => {
                tracing::info!("Database ping successful");
                Ok(gateway)
            }
            Err(source) => {
                tracing::error!(attempts, error = %source, "Failed to connect to database");
                gateway.close().await;
                Err(GatewayError::Connectivity { attempts, source })
            }
        }
    }

    /// Wrap an existing pool, skipping the startup probe.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Executor for sqlx queries. Waits for a free slot when all
    /// connections are busy.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// One round-trip to the store, bounded by [`PING_TIMEOUT`].
    ///
    /// Uses an idle pooled connection when one answers. Otherwise opens a
    /// dedicated connection with the pool's options, so a store that refuses
    /// connections fails immediately with the underlying error instead of
    /// queueing until the acquire timeout.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let probe = async {
            if let Some(mut conn) = self.pool.try_acquire() {
                if conn.ping().await.is_ok() {
                    return Ok(());
                }
                // stale after a store restart; retry on a fresh connection
                conn.close_on_drop();
            }
            let options = self.pool.connect_options();
            let mut conn = PgConnection::connect_with(&options).await?;
            conn.ping().await?;
            conn.close().await
        };

        match tokio::time::timeout(PING_TIMEOUT, probe).await {
            Ok(result) => result,
            Err(_) => Err(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("database did not answer within {PING_TIMEOUT:?}"),
            ))),
        }
    }

    /// Run a multi-statement script without bind parameters.
    pub async fn execute_script(&self, sql: &str) -> Result<(), GatewayError> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(GatewayError::Script)?;
        Ok(())
    }

    /// Release every connection. Safe to call more than once.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            tracing::info!("Closing database pool");
        }
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
