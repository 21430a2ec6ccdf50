//! Password hashing and signed session tokens.
//!
//! Sessions are explicit values with an expiry carried in the token
//! itself, rather than ambient server-side state: a token is a
//! hex-encoded claims payload plus a SHA-256 signature over a server
//! secret. Verification rejects tampered payloads and expired sessions
//! distinctly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UserId;

/// Errors from credential or token checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("malformed token")]
    MalformedToken,

    #[error("invalid token signature")]
    BadSignature,

    #[error("session expired")]
    Expired,
}

/// An authenticated session: who, and until when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Generate a fresh per-account salt.
pub fn generate_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hash a password with the account's salt, hex-encoded.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a password attempt against the stored salt and digest.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

/// Issues and verifies signed bearer tokens.
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issue a token for a user, valid for the configured TTL.
    pub fn issue(&self, user_id: UserId) -> String {
        let session = Session {
            user_id,
            expires_at: Utc::now() + self.ttl,
        };
        self.encode(&session)
    }

    /// Verify a token and return the session it carries.
    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let (payload_hex, signature) = token.split_once('.').ok_or(AuthError::MalformedToken)?;

        if self.sign(payload_hex) != signature {
            return Err(AuthError::BadSignature);
        }

        let payload = hex::decode(payload_hex).map_err(|_| AuthError::MalformedToken)?;
        let session: Session =
            serde_json::from_slice(&payload).map_err(|_| AuthError::MalformedToken)?;

        if session.is_expired() {
            return Err(AuthError::Expired);
        }
        Ok(session)
    }

    fn encode(&self, session: &Session) -> String {
        // Session serialization cannot fail; the claims are plain data.
        let payload = serde_json::to_vec(session).expect("session claims serialize");
        let payload_hex = hex::encode(payload);
        let signature = self.sign(&payload_hex);
        format!("{}.{}", payload_hex, signature)
    }

    fn sign(&self, payload_hex: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"|");
        hasher.update(payload_hex.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let salt = generate_salt();
        let hash = hash_password("hunter2", &salt);

        assert!(verify_password("hunter2", &salt, &hash));
        assert!(!verify_password("hunter3", &salt, &hash));
    }

    #[test]
    fn test_same_password_different_salts_differ() {
        let a = hash_password("hunter2", &generate_salt());
        let b = hash_password("hunter2", &generate_salt());
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_round_trip() {
        let signer = TokenSigner::new("secret", 60);
        let user_id = UserId::generate();

        let token = signer.issue(user_id);
        let session = signer.verify(&token).unwrap();

        assert_eq!(session.user_id, user_id);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_token_rejects_tampered_payload() {
        let signer = TokenSigner::new("secret", 60);
        let token = signer.issue(UserId::generate());

        let (payload, signature) = token.split_once('.').unwrap();
        let mut flipped = payload.to_string();
        // Flip a hex digit in the payload, keeping the old signature.
        let last = flipped.pop().unwrap();
        flipped.push(if last == '0' { '1' } else { '0' });

        let tampered = format!("{}.{}", flipped, signature);
        assert_eq!(signer.verify(&tampered), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = TokenSigner::new("secret-a", 60).issue(UserId::generate());
        let other = TokenSigner::new("secret-b", 60);

        assert_eq!(other.verify(&token), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_token_rejects_garbage() {
        let signer = TokenSigner::new("secret", 60);
        assert_eq!(signer.verify("nonsense"), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_expired_token() {
        // Zero TTL: the token is already expired when issued.
        let signer = TokenSigner::new("secret", 0);
        let token = signer.issue(UserId::generate());

        assert_eq!(signer.verify(&token), Err(AuthError::Expired));
    }
}
