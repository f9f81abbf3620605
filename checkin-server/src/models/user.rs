//! User record and creation payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use super::validation::REQUIRED_USER_FIELDS;
use super::ValidationError;

/// Persisted user. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Create payload.
///
/// Absent and `null` fields decode as empty strings so they reach
/// [`NewUser::validate`] instead of failing the decode. Unknown fields,
/// including a client-sent `id` or `created_at`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewUser {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
}

impl NewUser {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Every required field must be non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // same order as REQUIRED_USER_FIELDS
        let values = [&self.first_name, &self.last_name, &self.phone, &self.email];
        let missing: Vec<&'static str> = REQUIRED_USER_FIELDS
            .into_iter()
            .zip(values)
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields { missing })
        }
    }

    /// Attach the store-assigned identity.
    pub fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            created_at,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_payload_validates() {
        let user = NewUser::new("Ada", "Lovelace", "555-0100", "ada@example.com");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn each_empty_field_is_reported() {
        for field in REQUIRED_USER_FIELDS {
            let mut payload = json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "phone": "555-0100",
                "email": "ada@example.com",
            });
            payload[field] = json!("");

            let user: NewUser = serde_json::from_value(payload).unwrap();
            assert_eq!(
                user.validate(),
                Err(ValidationError::MissingFields {
                    missing: vec![field]
                })
            );
        }
    }

    #[test]
    fn empty_payload_reports_every_required_field_in_order() {
        assert_eq!(
            NewUser::default().validate(),
            Err(ValidationError::MissingFields {
                missing: REQUIRED_USER_FIELDS.to_vec()
            })
        );
    }

    #[test]
    fn absent_and_null_fields_decode_as_empty() {
        let user: NewUser =
            serde_json::from_value(json!({ "first_name": "Ada", "phone": null })).unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.phone, "");
        assert_eq!(
            user.validate(),
            Err(ValidationError::MissingFields {
                missing: vec!["last_name", "phone", "email"]
            })
        );
    }

    #[test]
    fn client_identity_fields_are_ignored() {
        let user: NewUser = serde_json::from_value(json!({
            "id": 999,
            "created_at": "2001-01-01T00:00:00Z",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "phone": "555-0100",
            "email": "ada@example.com",
        }))
        .unwrap();
        assert_eq!(user, NewUser::new("Ada", "Lovelace", "555-0100", "ada@example.com"));
    }

    #[test]
    fn wrong_type_fails_decode() {
        let result = serde_json::from_value::<NewUser>(json!({ "first_name": 42 }));
        assert!(result.is_err());
    }

    #[test]
    fn user_serializes_rfc3339_timestamp() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let user = NewUser::new("Ada", "Lovelace", "555-0100", "ada@example.com")
            .into_user(1, created_at);

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["created_at"], "2024-05-01T12:30:00Z");
    }
}
