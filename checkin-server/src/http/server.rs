//! Axum server setup
//!
//! Server skeleton with:
//! - Request logging middleware (outermost, so it times the whole stack)
//! - CORS for the configured local origins
//! - Static files as the fallback route
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::middleware::log_requests;
use super::routes;
use crate::state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8090)
    pub bind_addr: SocketAddr,

    /// Directory served for any path no API route claims
    pub static_dir: PathBuf,

    /// Origins allowed to call the API with credentials
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            static_dir: PathBuf::from("web/static"),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8090".to_string(),
            ],
        }
    }
}

/// Assemble routes, middleware and the static fallback.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router())
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors_layer(&config.cors_origins))
        .layer(middleware::from_fn(log_requests))
        .with_state(state);

    tracing::info!("Router initialized with all endpoints");
    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = origin.as_str(), "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    // Credentials rule out wildcards, so methods and headers are listed.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    log_banner(config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn log_banner(addr: SocketAddr) {
    tracing::info!(url = %format!("http://{addr}"), "Server running");
    tracing::info!("API Endpoints:");
    tracing::info!("   GET    /health       - Health check");
    tracing::info!("   POST   /api/user     - Create a new user");
    tracing::info!("   GET    /api/users    - Get all users");
    tracing::info!("   GET    /api/user/:id - Get user by ID");
    tracing::info!("   GET    /             - Static files");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!(signal = "ctrl_c", "Shutting down server");
        }
        _ = terminate => {
            tracing::info!(signal = "sigterm", "Shutting down server");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
