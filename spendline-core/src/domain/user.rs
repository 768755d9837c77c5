//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user
///
/// Users are created on registration and never mutated or deleted.
/// `password_hash` is an Argon2id PHC string, never the plain password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// Storage key of a user's expense list, `expenses_{userId}`
pub fn expenses_key(user_id: Uuid) -> String {
    format!("expenses_{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("Asha", "asha@example.com", "$argon2id$...");
        assert_eq!(user.name, "Asha");
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(expenses_key(user.id), format!("expenses_{}", user.id));
    }

    #[test]
    fn test_two_users_get_distinct_ids() {
        let a = User::new("A", "a@example.com", "h");
        let b = User::new("B", "b@example.com", "h");
        assert_ne!(a.id, b.id);
    }
}
