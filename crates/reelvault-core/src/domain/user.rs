use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{FieldSource, FieldValue};

/// User entity - the identity anchor every movie hangs off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with generated ID and timestamps.
    ///
    /// The email is normalized so uniqueness holds case-insensitively.
    pub fn new(email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registration input, checked before the password is hashed.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl FieldSource for NewAccount<'_> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "email" => Some(FieldValue::Text(self.email)),
            "password" => Some(FieldValue::Text(self.password)),
            _ => None,
        }
    }
}

/// Canonical form used for storing and looking up emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("  Alice@Example.COM ", "hash".to_string());
        assert_eq!(user.email, "alice@example.com");
        assert!(user.is_active);
    }

    #[test]
    fn test_hash_is_never_serialized() {
        let user = User::new("a@x.com", "$argon2id$secret".to_string());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }
}
