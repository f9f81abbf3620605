//! User repository
//!
//! Three SQL shapes plus a count for health reporting:
//! - insert: validate, then INSERT ... RETURNING id, created_at
//! - list: newest first, all or nothing
//! - get: single row or NotFound

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::Gateway;
use crate::models::{NewUser, User, ValidationError};

/// Returned by [`UserStore::count_all`] when the count query fails
pub const UNKNOWN_COUNT: i64 = -1;

/// Repository error type
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("user {id} not found")]
    NotFound { id: i64 },

    #[error("{0}")]
    Store(#[from] sqlx::Error),
}

/// Typed access to the `users` entity.
///
/// Implementations are stateless apart from the shared pool and safe to call
/// from any number of request tasks at once.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Validate and persist, returning the record with its assigned id and
    /// timestamp. Nothing is written when validation fails.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;

    /// Every user, most recent first. Empty table is an empty vec.
    async fn list_all(&self) -> Result<Vec<User>, RepoError>;

    async fn get_by_id(&self, id: i64) -> Result<User, RepoError>;

    /// Row count, or [`UNKNOWN_COUNT`] if it could not be read.
    async fn count_all(&self) -> i64;

    /// Store liveness.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// Postgres-backed [`UserStore`]
#[derive(Debug, Clone)]
pub struct PgUserRepo {
    gateway: Arc<Gateway>,
}

impl PgUserRepo {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl UserStore for PgUserRepo {
    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        user.validate()?;

        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO users (first_name, last_name, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.email)
        .fetch_one(self.gateway.pool())
        .await?;

        Ok(user.into_user(id, created_at))
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        // id breaks created_at ties so the order is stable between calls
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone, email, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.gateway.pool())
        .await?;

        Ok(users)
    }

    async fn get_by_id(&self, id: i64) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.gateway.pool())
        .await?
        .ok_or(RepoError::NotFound { id })
    }

    async fn count_all(&self) -> i64 {
        match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.gateway.pool())
            .await
        {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to count users");
                UNKNOWN_COUNT
            }
        }
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.gateway.ping().await
    }
}
