//! Current User Use Case
//!
//! Resolves the account behind an authenticated access token.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, ids::UserId};
use crate::error::{AuthError, AuthResult};

/// Public view of an account
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// Current user lookup use case
pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<CurrentUser> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(CurrentUser {
            user_id: user.user_id,
            email: user.email,
            created_at: user.created_at,
        })
    }
}
