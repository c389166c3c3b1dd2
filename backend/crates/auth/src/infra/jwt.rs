//! JWT Access Token Issuer
//!
//! Signs short-lived HS256 access tokens. Verification happens in the
//! bearer middleware, not here.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::error::{AuthError, AuthResult};

/// Claims carried by every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Fresh per token
    pub jti: String,
    /// User ID, duplicated for clients that ignore `sub`
    pub uid: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// HS256 access token issuer
#[derive(Clone)]
pub struct JwtIssuer {
    issuer: String,
    audience: String,
    encoding_key: EncodingKey,
    expiry_minutes: i64,
}

impl JwtIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            encoding_key: EncodingKey::from_secret(config.signing_key.as_bytes()),
            expiry_minutes: config.access_token_expiry_minutes,
        }
    }

    /// Sign an access token for `user`
    pub fn create_access_token(&self, user: &User) -> AuthResult<String> {
        let now = Utc::now();
        let exp = TimeDelta::try_minutes(self.expiry_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::Internal("Access token lifetime out of range".to_string()))?;
        let user_id = user.user_id.to_string();

        let claims = AccessTokenClaims {
            sub: user_id.clone(),
            email: user.email.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            uid: user_id,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Access token lifetime as reported to clients
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.expiry_minutes.saturating_mul(60)
    }
}
