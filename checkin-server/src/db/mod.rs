//! Database layer - gateway, bootstrap schema and repositories
//!
//! # Design Principles
//!
//! - The [`Gateway`] is the only owner of the pool; repositories borrow it
//! - Pool limits are bounded (25 open, 5 minute lifetime)
//! - Startup connectivity is retried, runtime failures are returned as-is
//! - Connection strings are only ever logged through [`redact`]

pub mod gateway;
pub mod migrations;
pub mod redact;
pub mod repos;

pub use gateway::{Gateway, GatewayError, PoolLimits, RetryPolicy};
pub use redact::redact;
