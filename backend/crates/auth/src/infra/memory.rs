//! In-Memory Repository Implementation
//!
//! Process-local store with the same uniqueness and conditional-revoke
//! behaviour as the Postgres schema. Locks are never held across an await.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    ids::{RefreshTokenId, UserId},
    refresh_secret::TokenHash,
};
use crate::error::{AuthError, AuthResult};

const USERS_EMAIL_KEY: &str = "users_email_key";
const USERS_PKEY: &str = "users_pkey";
const TOKEN_HASH_KEY: &str = "refresh_tokens_token_hash_key";
const TOKENS_PKEY: &str = "refresh_tokens_pkey";

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    refresh_tokens: HashMap<Uuid, RefreshToken>,
}

/// In-memory auth repository
#[derive(Default)]
pub struct InMemoryAuthRepository {
    tables: Mutex<Tables>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AuthError::Internal("In-memory store poisoned".to_string()))
    }

    /// Number of stored refresh tokens for `user_id`
    #[cfg(test)]
    pub fn refresh_token_count(&self, user_id: &UserId) -> AuthResult<usize> {
        let tables = self.lock()?;
        Ok(tables
            .refresh_tokens
            .values()
            .filter(|t| &t.user_id == user_id)
            .count())
    }
}

fn unique_violation(constraint: &str) -> AuthError {
    AuthError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tables = self.lock()?;

        if tables.users.contains_key(user.user_id.as_uuid()) {
            return Err(unique_violation(USERS_PKEY));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(unique_violation(USERS_EMAIL_KEY));
        }

        tables.users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.lock()?.users.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.lock()?.users.values().any(|u| &u.email == email))
    }
}

impl RefreshTokenRepository for InMemoryAuthRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        let mut tables = self.lock()?;

        if tables
            .refresh_tokens
            .contains_key(token.refresh_token_id.as_uuid())
        {
            return Err(unique_violation(TOKENS_PKEY));
        }
        if tables
            .refresh_tokens
            .values()
            .any(|t| t.token_hash == token.token_hash)
        {
            return Err(unique_violation(TOKEN_HASH_KEY));
        }
        if !tables.users.contains_key(token.user_id.as_uuid()) {
            return Err(AuthError::Internal(format!(
                "Refresh token references unknown user {}",
                token.user_id
            )));
        }

        tables
            .refresh_tokens
            .insert(*token.refresh_token_id.as_uuid(), token.clone());
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &TokenHash) -> AuthResult<Option<RefreshToken>> {
        Ok(self
            .lock()?
            .refresh_tokens
            .values()
            .find(|t| &t.token_hash == token_hash)
            .cloned())
    }

    async fn revoke(&self, token_id: &RefreshTokenId, now: DateTime<Utc>) -> AuthResult<bool> {
        let mut tables = self.lock()?;
        Ok(tables
            .refresh_tokens
            .get_mut(token_id.as_uuid())
            .is_some_and(|t| t.revoke_at(now)))
    }
}
