//! Email Value Object
//!
//! Normalized (trimmed, lower-cased) email address. Basic shape validation
//! only; the unique index on `users.email` is the authority on duplicates.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Maximum stored email length
pub const EMAIL_MAX_LENGTH: usize = 320;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Normalize without validating (lookup key for sign-in)
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Normalize and validate (registration)
    pub fn parse(raw: &str) -> AuthResult<Self> {
        let email = Self::normalized(raw);

        if email.0.is_empty() {
            return Err(AuthError::validation("Email is required."));
        }

        if email.0.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AuthError::validation(format!(
                "Email must be at most {} characters.",
                EMAIL_MAX_LENGTH
            )));
        }

        if !Self::is_valid_format(&email.0) {
            return Err(AuthError::validation("Email format is invalid."));
        }

        Ok(email)
    }

    /// Basic email format validation
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }

        if email.chars().any(char::is_whitespace) {
            return false;
        }

        // Domain shouldn't start or end with dot or hyphen
        !(domain.starts_with('.')
            || domain.ends_with('.')
            || domain.starts_with('-')
            || domain.ends_with('-'))
    }

    /// Create from database value (assumed already normalized)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
