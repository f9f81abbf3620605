//! API error type with IntoResponse
//!
//! Bodies are plain text. Each constructor logs, so every error path leaves
//! a line behind before the response goes out.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::repos::RepoError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body was not valid JSON for the expected shape (400)
    MalformedBody,

    /// Required fields missing (400)
    Validation(ValidationError),

    /// Path id is not an integer (400)
    InvalidId,

    /// No row for the id (404)
    NotFound { id: i64 },

    /// Any other store failure (500, message included)
    Store {
        action: &'static str,
        source: sqlx::Error,
    },
}

impl ApiError {
    pub fn malformed_body(reason: impl std::fmt::Display) -> Self {
        tracing::error!(error = %reason, "Invalid request body");
        Self::MalformedBody
    }

    pub fn invalid_id(raw: &str) -> Self {
        tracing::warn!(id = raw, "Invalid user id");
        Self::InvalidId
    }

    /// Map a repository failure. `action` completes "Failed to ..." in the
    /// 500 body, e.g. `"create user"`.
    pub fn from_repo(action: &'static str, err: RepoError) -> Self {
        match err {
            RepoError::Validation(e) => {
                if let ValidationError::MissingFields { missing } = &e {
                    tracing::warn!(missing = ?missing, "Missing required fields");
                }
                Self::Validation(e)
            }
            RepoError::NotFound { id } => {
                tracing::warn!(id, "User not found");
                Self::NotFound { id }
            }
            RepoError::Store(source) => {
                tracing::error!(error = %source, "Database error");
                Self::Store { action, source }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody | Self::Validation(_) | Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedBody => f.write_str("Invalid request body"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::InvalidId => f.write_str("Invalid user id"),
            Self::NotFound { .. } => f.write_str("User not found"),
            Self::Store { action, source } => write!(f, "Failed to {action}: {source}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
