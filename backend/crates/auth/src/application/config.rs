//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup,
//! validated, then shared read-only behind an `Arc`.

use std::env;
use std::fmt;

use chrono::TimeDelta;
use platform::password::DEFAULT_ITERATIONS;
use thiserror::Error;

/// Minimum HMAC signing key length in bytes
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

/// Longest accepted access token lifetime (one year)
pub const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 525_600;

/// Longest accepted refresh token lifetime (ten years)
pub const MAX_REFRESH_TOKEN_VALIDITY_DAYS: i64 = 3_650;

const ENV_ISSUER: &str = "JWT_ISSUER";
const ENV_AUDIENCE: &str = "JWT_AUDIENCE";
const ENV_SIGNING_KEY: &str = "JWT_SIGNING_KEY";
const ENV_ACCESS_TOKEN_EXPIRY_MINUTES: &str = "JWT_ACCESS_TOKEN_EXPIRY_MINUTES";
const ENV_REFRESH_TOKEN_VALIDITY_DAYS: &str = "JWT_REFRESH_TOKEN_VALIDITY_DAYS";

/// Configuration errors, reported at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("Signing key must be at least {min} bytes (got {actual})")]
    SigningKeyTooShort { min: usize, actual: usize },

    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: i64 },

    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// JWT `iss` claim
    pub issuer: String,
    /// JWT `aud` claim
    pub audience: String,
    /// HMAC-SHA256 signing key (UTF-8 bytes are used as-is)
    pub signing_key: String,
    /// Access token lifetime (default 60)
    pub access_token_expiry_minutes: i64,
    /// Refresh token lifetime (default 14)
    pub refresh_token_validity_days: i64,
    /// PBKDF2 iterations for new hashes. Existing hashes keep their own count.
    pub password_hash_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "auth-service".to_string(),
            audience: "auth-clients".to_string(),
            signing_key: String::new(),
            access_token_expiry_minutes: 60,
            refresh_token_validity_days: 14,
            password_hash_iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("signing_key", &"[REDACTED]")
            .field("access_token_expiry_minutes", &self.access_token_expiry_minutes)
            .field("refresh_token_validity_days", &self.refresh_token_validity_days)
            .field("password_hash_iterations", &self.password_hash_iterations)
            .finish()
    }
}

impl AuthConfig {
    /// Create config for development (fixed, public signing key)
    pub fn development() -> Self {
        Self {
            signing_key: "development-only-signing-key-do-not-deploy".to_string(),
            ..Default::default()
        }
    }

    /// Load from environment variables, falling back to defaults
    ///
    /// The result is not validated; call [`AuthConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            issuer: env::var(ENV_ISSUER).unwrap_or(defaults.issuer),
            audience: env::var(ENV_AUDIENCE).unwrap_or(defaults.audience),
            signing_key: env::var(ENV_SIGNING_KEY).unwrap_or_default(),
            access_token_expiry_minutes: parse_env(
                ENV_ACCESS_TOKEN_EXPIRY_MINUTES,
                defaults.access_token_expiry_minutes,
            )?,
            refresh_token_validity_days: parse_env(
                ENV_REFRESH_TOKEN_VALIDITY_DAYS,
                defaults.refresh_token_validity_days,
            )?,
            password_hash_iterations: defaults.password_hash_iterations,
        })
    }

    /// Check startup invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Empty { field: "issuer" });
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::Empty { field: "audience" });
        }

        let key_len = self.signing_key.len();
        if key_len < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::SigningKeyTooShort {
                min: MIN_SIGNING_KEY_BYTES,
                actual: key_len,
            });
        }

        check_lifetime(
            "access_token_expiry_minutes",
            self.access_token_expiry_minutes,
            MAX_ACCESS_TOKEN_EXPIRY_MINUTES,
        )?;
        check_lifetime(
            "refresh_token_validity_days",
            self.refresh_token_validity_days,
            MAX_REFRESH_TOKEN_VALIDITY_DAYS,
        )?;
        if self.password_hash_iterations == 0 {
            return Err(ConfigError::NonPositive {
                field: "password_hash_iterations",
            });
        }

        Ok(())
    }

    /// Refresh token lifetime, `None` when out of range
    pub fn refresh_token_validity(&self) -> Option<TimeDelta> {
        TimeDelta::try_days(self.refresh_token_validity_days)
    }
}

fn check_lifetime(field: &'static str, value: i64, max: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositive { field });
    }
    if value > max {
        return Err(ConfigError::TooLarge { field, max });
    }
    Ok(())
}

fn parse_env(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}
