//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::value_object::{
    email::Email,
    ids::{RefreshTokenId, UserId},
    refresh_secret::TokenHash,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    ///
    /// Fails with `AuthError::UniqueViolation` when the email is taken.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Refresh token repository trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Persist a newly issued token
    ///
    /// Fails with `AuthError::UniqueViolation` on a duplicate hash.
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    /// Find token by hash, regardless of state
    async fn find_by_hash(&self, token_hash: &TokenHash) -> AuthResult<Option<RefreshToken>>;

    /// Set `revoked_at` if the token is not already revoked
    ///
    /// Returns true only for the caller whose write took effect.
    async fn revoke(&self, token_id: &RefreshTokenId, now: DateTime<Utc>) -> AuthResult<bool>;
}
