//! Domain models
//!
//! Client payloads decode into [`NewUser`] and are checked with
//! [`NewUser::validate`] before anything touches the store.

pub mod user;
pub mod validation;

pub use user::{NewUser, User};
pub use validation::ValidationError;
