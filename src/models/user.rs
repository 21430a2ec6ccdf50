//! User account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A registered account. Owns zero or more sleep records; deleting the
/// account cascades to its records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    pub username: String,

    /// Unique across accounts (compared case-insensitively).
    pub email: String,

    /// Salted SHA-256 digest of the password, hex-encoded.
    pub password_hash: String,

    /// Per-account salt mixed into the password digest.
    pub password_salt: String,

    /// When this account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with a fresh ID. The password must already be
    /// hashed by the caller (see `auth::hash_password`).
    pub fn new(username: String, email: String, password_hash: String, password_salt: String) -> Self {
        Self {
            id: UserId::generate(),
            username,
            email,
            password_hash,
            password_salt,
            created_at: Utc::now(),
        }
    }
}

/// The account fields safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new(
            "marina".to_string(),
            "marina@example.com".to_string(),
            "hash".to_string(),
            "salt".to_string(),
        );

        assert_eq!(user.username, "marina");
        assert_eq!(user.email, "marina@example.com");
    }

    #[test]
    fn test_profile_hides_credentials() {
        let user = User::new(
            "marina".to_string(),
            "marina@example.com".to_string(),
            "hash".to_string(),
            "salt".to_string(),
        );

        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();

        assert!(!json.contains("hash"));
        assert!(!json.contains("salt"));
        assert!(json.contains("marina@example.com"));
    }
}
