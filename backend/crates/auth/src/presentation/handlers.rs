//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::{CredentialService, CredentialsInput, CurrentUserUseCase};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, MeResponse, RefreshRequest, RegisterRequest, TokenPairResponse,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    pub credentials: Arc<CredentialService<R, R>>,
    pub current_user: Arc<CurrentUserUseCase<R>>,
}

impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            current_user: self.current_user.clone(),
        }
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let input = CredentialsInput {
        email: req.email,
        password: req.password,
    };

    let pair = state.credentials.register(input).await?;

    Ok(Json(pair.into()))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let input = CredentialsInput {
        email: req.email,
        password: req.password,
    };

    let pair = state.credentials.login(input).await?;

    Ok(Json(pair.into()))
}

// ============================================================================
// Refresh Tokens
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let pair = state.credentials.refresh(&req.refresh_token).await?;

    Ok(Json(pair.into()))
}

/// POST /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    state.credentials.logout(&req.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/users/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AuthResult<Json<MeResponse>>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let current = state.current_user.execute(&user.user_id).await?;

    Ok(Json(current.into()))
}
