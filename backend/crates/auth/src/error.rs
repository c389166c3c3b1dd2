//! Auth Error Types
//!
//! The fixed error taxonomy returned by every credential operation. Variants
//! classify the failure; deciding what reaches the wire is left to the
//! presentation layer.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("{0}")]
    ValidationFailed(String),

    /// Unknown email or wrong password. Both causes share this variant.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Email taken, whether caught by the pre-check or the unique index
    #[error("Email is already registered.")]
    EmailAlreadyRegistered,

    /// Unknown, expired or already revoked refresh token
    #[error("Invalid refresh token.")]
    InvalidRefreshToken,

    /// Only used by the current-user lookup
    #[error("User not found.")]
    UserNotFound,

    /// Storage rejected a write on a unique constraint
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::ValidationFailed(message.into())
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::ValidationFailed(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::InvalidRefreshToken => {
                ErrorKind::Unauthorized
            }
            AuthError::EmailAlreadyRegistered => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(sqlx::Error::PoolTimedOut) => ErrorKind::ServiceUnavailable,
            AuthError::UniqueViolation { .. }
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures get a generic message; their details only reach the log.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            AppError::new(kind, "An unexpected error occurred. Please try again.")
        } else {
            AppError::new(kind, self.to_string())
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::UniqueViolation { constraint } => {
                tracing::error!(constraint = %constraint, "Auth unexpected unique violation");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AuthError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                }
            }
            _ => AuthError::Database(err),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.to_app_error()
    }
}
