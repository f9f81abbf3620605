//! Custom Axum extractors
//!
//! Both reject with [`ApiError`] so failures come back as plain-text 400s
//! instead of axum's default rejections.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body decoded without looking at `Content-Type`.
///
/// Any read or decode failure is [`ApiError::MalformedBody`].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::malformed_body(rejection.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(ApiError::malformed_body)
    }
}

/// Extract an integer user id from path
pub struct UserId(pub i64);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_id(""))?;

        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| ApiError::invalid_id(&raw))
    }
}
