//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{CredentialService, CurrentUserUseCase};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AccessTokenValidator, require_bearer};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> AuthResult<Router> {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
///
/// Routes are relative; the binary nests them under `/api`.
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> AuthResult<Router>
where
    R: UserRepository + RefreshTokenRepository + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let validator = AccessTokenValidator::new(&config);
    let config = Arc::new(config);

    let state = AuthAppState {
        credentials: Arc::new(CredentialService::new(
            repo.clone(),
            repo.clone(),
            config,
        )?),
        current_user: Arc::new(CurrentUserUseCase::new(repo)),
    };

    let protected = Router::new()
        .route("/users/me", get(handlers::me::<R>))
        .route_layer(middleware::from_fn_with_state(validator, require_bearer));

    Ok(Router::new()
        .route("/auth/register", post(handlers::register::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .route("/auth/refresh", post(handlers::refresh::<R>))
        .route("/auth/logout", post(handlers::logout::<R>))
        .merge(protected)
        .with_state(state))
}
