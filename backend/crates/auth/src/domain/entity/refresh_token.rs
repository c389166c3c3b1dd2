//! Refresh Token Entity
//!
//! Persisted record of an issued refresh token. Only the hash of the secret
//! is stored. A token is usable while it is unrevoked and unexpired; once
//! `revoked_at` is set it never clears.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::value_object::{
    ids::{RefreshTokenId, UserId},
    refresh_secret::TokenHash,
};

/// Refresh token entity
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub refresh_token_id: RefreshTokenId,
    /// Owning user
    pub user_id: UserId,
    /// base64(SHA-256(secret))
    pub token_hash: TokenHash,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Issue a new token record valid for `validity` from `now`
    ///
    /// `None` when the expiry is not representable.
    pub fn issue(
        user_id: UserId,
        token_hash: TokenHash,
        now: DateTime<Utc>,
        validity: TimeDelta,
    ) -> Option<Self> {
        Some(Self {
            refresh_token_id: RefreshTokenId::new(),
            user_id,
            token_hash,
            expires_at: now.checked_add_signed(validity)?,
            created_at: now,
            revoked_at: None,
        })
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Active at `now`: not revoked and not yet past `expires_at`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && now <= self.expires_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Mark revoked. Returns false when already revoked.
    pub fn revoke_at(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_revoked() {
            return false;
        }
        self.revoked_at = Some(now);
        true
    }
}
