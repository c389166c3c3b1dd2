//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Credential service, current user lookup, config
//! - `infra/` - PostgreSQL and in-memory stores, JWT issuer
//! - `presentation/` - HTTP handlers, DTOs, bearer middleware, router
//!
//! ## Features
//! - Email + password registration and login
//! - Short-lived HS256 access tokens
//! - Opaque refresh tokens with mandatory one-shot rotation
//! - Idempotent logout
//!
//! ## Security Model
//! - Passwords hashed with PBKDF2-HMAC-SHA256, iteration count stored per hash
//! - Refresh tokens stored only as SHA-256 hashes
//! - Unknown email and wrong password are indistinguishable to callers
//! - A refresh token is consumed by at most one concurrent request

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use application::{CredentialService, CredentialsInput, TokenPair};
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
