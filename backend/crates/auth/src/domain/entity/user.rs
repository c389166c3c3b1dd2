//! User Entity
//!
//! A registered account. Email is the unique login identifier.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, ids::UserId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal ID (UUID v4)
    pub user_id: UserId,
    /// Normalized email, unique across users
    pub email: Email,
    /// PBKDF2 "iterations.salt.key" string
    pub password_hash: HashedPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
