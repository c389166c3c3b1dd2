//! Credential Service
//!
//! Register, login, refresh and logout. Refresh tokens move from active to
//! revoked exactly once; expiry is derived from `expires_at` on every read.
//! Nothing is cached between calls.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use derive_more::Display;
use platform::password::{
    ClearTextPassword, HashedPassword, MIN_PASSWORD_LENGTH, PasswordHasher, PasswordPolicyError,
};
use serde::Serialize;

use crate::application::config::AuthConfig;
use crate::domain::entity::{refresh_token::RefreshToken, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{email::Email, refresh_secret::RefreshSecret};
use crate::error::{AuthError, AuthResult};
use crate::infra::jwt::JwtIssuer;

/// Email + password as submitted by the client
pub struct CredentialsInput {
    pub email: String,
    pub password: String,
}

/// Token type reported alongside every pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum TokenType {
    #[display("Bearer")]
    Bearer,
}

/// Access token plus its paired refresh secret
pub struct TokenPair {
    pub access_token: String,
    /// Plaintext secret, only ever returned here
    pub refresh_token: String,
    pub token_type: TokenType,
    pub expires_in_seconds: i64,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in_seconds", &self.expires_in_seconds)
            .field("refresh_token_expires_at", &self.refresh_token_expires_at)
            .finish()
    }
}

/// Credential lifecycle service
pub struct CredentialService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    hasher: PasswordHasher,
    /// Verified against when the login email is unknown
    dummy_hash: HashedPassword,
    jwt: JwtIssuer,
    config: Arc<AuthConfig>,
}

impl<U, T> CredentialService<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        config: Arc<AuthConfig>,
    ) -> AuthResult<Self> {
        let hasher = PasswordHasher::with_iterations(config.password_hash_iterations)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let dummy_hash = hasher
            .hash(&ClearTextPassword::new(String::from("unknown-account")))
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(Self {
            user_repo,
            token_repo,
            hasher,
            dummy_hash,
            jwt: JwtIssuer::new(&config),
            config,
        })
    }

    /// Create an account and sign it in
    pub async fn register(&self, input: CredentialsInput) -> AuthResult<TokenPair> {
        let password = ClearTextPassword::new(input.password);

        if input.email.trim().is_empty() || password.is_blank() {
            return Err(AuthError::validation("Email and password are required."));
        }

        let email = Email::parse(&input.email)?;

        password.check_policy().map_err(|e| match e {
            PasswordPolicyError::TooShort { .. } => AuthError::validation(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            )),
            PasswordPolicyError::EmptyOrWhitespace => {
                AuthError::validation("Email and password are required.")
            }
        })?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = self
            .hasher
            .hash(&password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(email, password_hash);

        // A concurrent registration can pass the existence check; the unique
        // index decides.
        match self.user_repo.create(&user).await {
            Ok(()) => {}
            Err(AuthError::UniqueViolation { constraint }) => {
                tracing::info!(constraint = %constraint, "Registration lost email race");
                return Err(AuthError::EmailAlreadyRegistered);
            }
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %user.user_id, "User registered");

        self.issue_token_pair(&user).await
    }

    /// Verify credentials and issue a new pair
    pub async fn login(&self, input: CredentialsInput) -> AuthResult<TokenPair> {
        let password = ClearTextPassword::new(input.password);

        if input.email.trim().is_empty() || password.is_blank() {
            return Err(AuthError::validation("Email and password are required."));
        }

        let email = Email::normalized(&input.email);

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            let _ = self.hasher.verify(&password, &self.dummy_hash);
            tracing::debug!("Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(&password, &user.password_hash) {
            tracing::info!(user_id = %user.user_id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.user_id, "User logged in");

        self.issue_token_pair(&user).await
    }

    /// Exchange an active refresh token for a new pair
    ///
    /// The presented token is revoked before the new one is issued. Of two
    /// concurrent calls with the same token at most one succeeds.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let secret = RefreshSecret::from_client(refresh_token);
        if secret.is_blank() {
            return Err(AuthError::validation("Refresh token is required."));
        }

        let now = Utc::now();

        let token = self
            .token_repo
            .find_by_hash(&secret.hash())
            .await?
            .filter(|t| t.is_active_at(now))
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !self.token_repo.revoke(&token.refresh_token_id, now).await? {
            tracing::warn!(
                refresh_token_id = %token.refresh_token_id,
                "Refresh token already revoked by a concurrent request"
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .user_repo
            .find_by_id(&token.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        tracing::info!(
            user_id = %user.user_id,
            refresh_token_id = %token.refresh_token_id,
            "Refresh token rotated"
        );

        self.issue_token_pair(&user).await
    }

    /// Revoke a refresh token
    ///
    /// Succeeds for blank, unknown and already revoked tokens.
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        let secret = RefreshSecret::from_client(refresh_token);
        if secret.is_blank() {
            return Ok(());
        }

        let Some(token) = self.token_repo.find_by_hash(&secret.hash()).await? else {
            return Ok(());
        };

        if token.is_revoked() {
            return Ok(());
        }

        if self.token_repo.revoke(&token.refresh_token_id, Utc::now()).await? {
            tracing::info!(
                user_id = %token.user_id,
                refresh_token_id = %token.refresh_token_id,
                "Refresh token revoked"
            );
        }

        Ok(())
    }

    /// Sign an access token and persist a new refresh token for `user`
    async fn issue_token_pair(&self, user: &User) -> AuthResult<TokenPair> {
        let access_token = self.jwt.create_access_token(user)?;

        let secret = RefreshSecret::generate()?;
        let record = self
            .config
            .refresh_token_validity()
            .and_then(|validity| {
                RefreshToken::issue(user.user_id, secret.hash(), Utc::now(), validity)
            })
            .ok_or_else(|| AuthError::Internal("Refresh token lifetime out of range".to_string()))?;

        self.token_repo.create(&record).await?;

        Ok(TokenPair {
            access_token,
            refresh_token: secret.into_string(),
            token_type: TokenType::Bearer,
            expires_in_seconds: self.jwt.access_token_expiry_seconds(),
            refresh_token_expires_at: record.expires_at,
        })
    }
}
