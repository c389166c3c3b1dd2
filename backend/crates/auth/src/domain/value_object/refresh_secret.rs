//! Refresh Token Secret Value Objects
//!
//! The client-facing secret is 64 random bytes, base64 encoded. Only its
//! [`TokenHash`] is ever persisted.

use std::fmt;

use platform::crypto;

use crate::error::{AuthError, AuthResult};

/// Random bytes behind every refresh token secret
pub const REFRESH_SECRET_BYTES: usize = 64;

/// Opaque refresh token secret as handed to (or received from) the client
pub struct RefreshSecret(String);

impl RefreshSecret {
    /// Generate a fresh secret from the OS random source
    pub fn generate() -> AuthResult<Self> {
        let bytes = crypto::random_bytes(REFRESH_SECRET_BYTES)
            .map_err(|e| AuthError::Internal(format!("Random source unavailable: {}", e)))?;
        Ok(Self(crypto::to_base64(&bytes)))
    }

    /// Wrap a secret presented by a client
    pub fn from_client(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Storage lookup hash of this secret
    pub fn hash(&self) -> TokenHash {
        TokenHash(crypto::token_hash(&self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for RefreshSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshSecret").field(&"[REDACTED]").finish()
    }
}

/// base64(SHA-256(secret)), unique across all refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenHash(String);

impl TokenHash {
    pub fn from_db(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
