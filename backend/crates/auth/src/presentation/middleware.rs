//! Auth Middleware
//!
//! Bearer access token verification for protected routes.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use kernel::error::app_error::AppError;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::ids::UserId;
use crate::infra::jwt::AccessTokenClaims;

/// Tolerated clock difference between issuer and verifier
pub const CLOCK_SKEW_SECONDS: u64 = 30;

/// Verifies signature, issuer, audience and lifetime of access tokens
#[derive(Clone)]
pub struct AccessTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = CLOCK_SKEW_SECONDS;

        Self {
            decoding_key: DecodingKey::from_secret(config.signing_key.as_bytes()),
            validation,
        }
    }

    /// Decode and verify a token. `None` for any failure.
    pub fn validate(&self, token: &str) -> Option<AccessTokenClaims> {
        match decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Access token rejected");
                None
            }
        }
    }
}

/// Identity of a verified bearer, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

impl AuthenticatedUser {
    fn from_claims(claims: AccessTokenClaims) -> Option<Self> {
        let uuid = Uuid::parse_str(&claims.uid).ok()?;
        Some(Self {
            user_id: UserId::from_uuid(uuid),
            email: claims.email,
        })
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid bearer access token
pub async fn require_bearer(
    State(validator): State<AccessTokenValidator>,
    mut req: Request,
    next: Next,
) -> Response {
    let user = bearer_token(&req)
        .and_then(|token| validator.validate(token))
        .and_then(AuthenticatedUser::from_claims);

    let Some(user) = user else {
        return AppError::unauthorized("A valid bearer token is required.").into_response();
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
