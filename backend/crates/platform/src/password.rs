//! Password Hashing and Verification
//!
//! PBKDF2-HMAC-SHA256 password handling with:
//! - 16-byte random salt per hash, 32-byte derived key, 100 000 iterations
//! - Self-describing storage format `iterations.base64(salt).base64(key)`
//! - Zeroization of clear text passwords
//! - Constant-time key comparison
//!
//! ## Forward compatibility
//! Verification reads the iteration count and key length from the stored
//! string, so hashes produced with older parameters keep validating after the
//! defaults are raised.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{constant_time_eq, from_base64, random_bytes, to_base64};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default PBKDF2 iteration count
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Salt size in bytes
pub const SALT_SIZE: usize = 16;

/// Derived key size in bytes
pub const KEY_SIZE: usize = 32;

const FIELD_SEPARATOR: char = '.';

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is empty or whitespace only
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// The OS random source failed; not recoverable
    #[error("Random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),

    /// Iteration count of zero was requested
    #[error("Iteration count must be positive")]
    ZeroIterations,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// Construction performs no validation; registration applies
/// [`ClearTextPassword::check_policy`] explicitly, sign-in does not.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    /// True for an empty or whitespace-only password
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Length in Unicode scalar values
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// Registration policy: non-blank and at least [`MIN_PASSWORD_LENGTH`] characters
    pub fn check_policy(&self) -> Result<(), PasswordPolicyError> {
        if self.is_blank() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let actual = self.char_count();
        if actual < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual,
            });
        }

        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Stored password hash in `iterations.base64(salt).base64(key)` form
///
/// Loading from storage never fails: a malformed value simply never verifies.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a value read from storage
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the encoded string for storage
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iteration count encoded in the hash, if it parses
    pub fn iterations(&self) -> Option<u32> {
        EncodedHash::parse(&self.0).map(|h| h.iterations)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// PBKDF2-HMAC-SHA256 password hasher
///
/// Stateless apart from the iteration count used for new hashes.
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordHasher};
///
/// let hasher = PasswordHasher::with_iterations(1_000).unwrap();
/// let password = ClearTextPassword::new("correct horse".to_string());
/// let hashed = hasher.hash(&password).unwrap();
///
/// assert!(hasher.verify(&password, &hashed));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    /// Hasher with a custom iteration count for new hashes
    pub fn with_iterations(iterations: u32) -> Result<Self, PasswordHashError> {
        if iterations == 0 {
            return Err(PasswordHashError::ZeroIterations);
        }
        Ok(Self { iterations })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = random_bytes(SALT_SIZE)?;
        let key = derive_key(password.as_bytes(), &salt, self.iterations, KEY_SIZE);

        Ok(HashedPassword(format!(
            "{}{sep}{}{sep}{}",
            self.iterations,
            to_base64(&salt),
            to_base64(&key),
            sep = FIELD_SEPARATOR
        )))
    }

    /// Verify a password against a stored hash
    ///
    /// Returns `false` for a wrong password and for any malformed stored
    /// value alike. The derived key is compared in constant time.
    pub fn verify(&self, password: &ClearTextPassword, stored: &HashedPassword) -> bool {
        let Some(encoded) = EncodedHash::parse(stored.as_str()) else {
            return false;
        };

        let actual = derive_key(
            password.as_bytes(),
            &encoded.salt,
            encoded.iterations,
            encoded.key.len(),
        );

        constant_time_eq(&actual, &encoded.key)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Decoded fields of a stored hash
struct EncodedHash {
    iterations: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl EncodedHash {
    fn parse(stored: &str) -> Option<Self> {
        let mut fields = stored.splitn(3, FIELD_SEPARATOR);
        let iterations = fields.next()?.parse::<u32>().ok()?;
        let salt = from_base64(fields.next()?).ok()?;
        let key = from_base64(fields.next()?).ok()?;

        // An empty key would compare equal to any empty derivation
        if iterations == 0 || key.is_empty() {
            return None;
        }

        Some(Self {
            iterations,
            salt,
            key,
        })
    }
}

fn derive_key(password: &[u8], salt: &[u8], iterations: u32, len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
    key
}

// ============================================================================
// Tests
// ============================================================================
