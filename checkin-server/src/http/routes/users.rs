//! User endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, UserId};
use crate::models::{NewUser, User};
use crate::state::AppState;

/// POST /api/user - create a user
#[tracing::instrument(name = "create_user", skip_all)]
async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    tracing::info!(user = ?payload, "Received request");

    let user = state
        .users()
        .insert(payload)
        .await
        .map_err(|e| ApiError::from_repo("create user", e))?;

    tracing::info!(id = user.id, email = %user.email, "User created successfully");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users - every user, newest first
#[tracing::instrument(name = "list_users", skip_all)]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    tracing::info!("Fetching all users");

    let users = state
        .users()
        .list_all()
        .await
        .map_err(|e| ApiError::from_repo("fetch users", e))?;

    tracing::info!(count = users.len(), "Successfully fetched users");
    Ok(Json(users))
}

/// GET /api/user/{id} - a single user
#[tracing::instrument(name = "get_user", skip_all)]
async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<User>, ApiError> {
    tracing::info!(id, "Fetching user");

    let user = state
        .users()
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_repo("fetch user", e))?;

    tracing::info!(id = user.id, email = %user.email, "Successfully fetched user");
    Ok(Json(user))
}

/// User routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/user", post(create_user))
        .route("/api/users", get(list_users))
        .route("/api/user/{id}", get(get_user))
}
