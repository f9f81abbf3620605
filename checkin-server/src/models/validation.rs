//! Validation error types

use std::fmt;

/// Fields every new user must carry, in the order they are reported
pub const REQUIRED_USER_FIELDS: [&str; 4] = ["first_name", "last_name", "phone", "email"];

/// Validation error for client payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were empty or absent
    MissingFields { missing: Vec<&'static str> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The message always lists the full requirement, not just the gaps.
            Self::MissingFields { .. } => write!(
                f,
                "Missing required fields: {}",
                REQUIRED_USER_FIELDS.join(", ")
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::MissingFields {
            missing: vec!["phone"],
        };
        assert_eq!(
            err.to_string(),
            "Missing required fields: first_name, last_name, phone, email"
        );
    }
}
