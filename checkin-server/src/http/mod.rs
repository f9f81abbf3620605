//! HTTP layer
//!
//! Axum server with:
//! - Request logging (dense layout, probe paths demoted or skipped)
//! - CORS for the local front-end origins
//! - Plain-text error bodies, status code as the machine-readable signal
//! - Static file fallback
//! - Graceful shutdown

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig, ServerError};
