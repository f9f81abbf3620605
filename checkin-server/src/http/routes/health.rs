//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};

use crate::health::{self, HealthReport};
use crate::state::AppState;

/// GET /health - 200 when the store answers, 503 otherwise
#[tracing::instrument(name = "health_check", skip_all)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = health::check(state.users()).await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
