//! Auth collaborator: resolves a websocket session token to a user id.
//!
//! DESIGN
//! ======
//! The websocket upgrade calls [`TokenVerifier::verify`] before any
//! connection is registered. Token issuance lives outside this server; the
//! bundled [`SignedTokenVerifier`] only checks tokens of the form
//! `<user_id>.<hex sha256(secret "." user_id)>`.

use std::fmt;

use sha2::{Digest, Sha256};

/// Authenticated user identifier carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[cfg(test)]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token missing")]
    Missing,
    #[error("token malformed")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
}

/// Resolves a session token to the user it was issued for.
pub trait TokenVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the token is missing, malformed, or not
    /// signed with the expected key.
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}

/// Verifies `<user_id>.<signature>` tokens against a shared secret.
pub struct SignedTokenVerifier {
    secret: String,
}

impl SignedTokenVerifier {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

impl TokenVerifier for SignedTokenVerifier {
    fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }
        let (user_id, signature) = token.rsplit_once('.').ok_or(AuthError::Malformed)?;
        if user_id.is_empty() || signature.is_empty() {
            return Err(AuthError::Malformed);
        }
        if !constant_time_eq(signature.as_bytes(), signature_for(&self.secret, user_id).as_bytes()) {
            return Err(AuthError::BadSignature);
        }
        Ok(UserId::new(user_id))
    }
}

/// Produce a token the [`SignedTokenVerifier`] with the same secret accepts.
#[cfg(test)]
#[must_use]
pub fn sign(secret: &str, user_id: &str) -> String {
    format!("{user_id}.{}", signature_for(secret, user_id))
}

fn signature_for(secret: &str, user_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b".");
    hasher.update(user_id.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
