//! PostgreSQL Repository Implementations
//!
//! Every statement runs in its own implicit transaction. Uniqueness is
//! enforced by `users_email_key` and `refresh_tokens_token_hash_key`.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    ids::{RefreshTokenId, UserId},
    refresh_secret::TokenHash,
};
use crate::error::AuthResult;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password_hash,
                created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (
                refresh_token_id,
                user_id,
                token_hash,
                expires_at,
                created_at,
                revoked_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.refresh_token_id.as_uuid())
        .bind(token.user_id.as_uuid())
        .bind(token.token_hash.as_str())
        .bind(token.expires_at)
        .bind(token.created_at)
        .bind(token.revoked_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &TokenHash) -> AuthResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT
                refresh_token_id,
                user_id,
                token_hash,
                expires_at,
                created_at,
                revoked_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshTokenRow::into_refresh_token))
    }

    async fn revoke(&self, token_id: &RefreshTokenId, now: DateTime<Utc>) -> AuthResult<bool> {
        // Only the first writer sees a row; concurrent callers get 0
        let affected = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $2
            WHERE refresh_token_id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token_id.as_uuid())
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected == 1)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_stored(self.password_hash),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    refresh_token_id: Uuid,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRow {
    fn into_refresh_token(self) -> RefreshToken {
        RefreshToken {
            refresh_token_id: RefreshTokenId::from_uuid(self.refresh_token_id),
            user_id: UserId::from_uuid(self.user_id),
            token_hash: TokenHash::from_db(self.token_hash),
            expires_at: self.expires_at,
            created_at: self.created_at,
            revoked_at: self.revoked_at,
        }
    }
}
