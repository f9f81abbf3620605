//! Request logging middleware

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Level;

use crate::logging;

/// Browser devtools probe, never logged
pub const DEVTOOLS_PROBE_PATH: &str = "/.well-known/appspecific/com.chrome.devtools.json";

/// Logged at DEBUG only
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Log method, path, status and duration of every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if path == DEVTOOLS_PROBE_PATH {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let start = Instant::now();
    let response = next.run(request).await;

    let level = if path == FAVICON_PATH {
        Level::DEBUG
    } else {
        Level::INFO
    };
    logging::request(
        level,
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}
