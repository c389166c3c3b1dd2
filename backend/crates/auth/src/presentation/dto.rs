//! API DTOs (Data Transfer Objects)
//!
//! Missing string fields deserialize as empty so they surface as
//! validation errors rather than extractor rejections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{CurrentUser, TokenPair};

// ============================================================================
// Requests
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Refresh and logout request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Token pair response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in_seconds: i64,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type.to_string(),
            expires_in_seconds: pair.expires_in_seconds,
            refresh_token_expires_at: pair.refresh_token_expires_at,
        }
    }
}

/// Current user response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<CurrentUser> for MeResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
