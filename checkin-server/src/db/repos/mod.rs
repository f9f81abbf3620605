//! Repository implementations for database access
//!
//! Handlers talk to the [`UserStore`] trait; [`PgUserRepo`] is the Postgres
//! implementation on top of the [`Gateway`](crate::db::Gateway).

pub mod users;

pub use users::{PgUserRepo, RepoError, UserStore, UNKNOWN_COUNT};
