//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod credential_service;
pub mod current_user;

// Re-exports
pub use config::{AuthConfig, ConfigError};
pub use credential_service::{CredentialService, CredentialsInput, TokenPair, TokenType};
pub use current_user::{CurrentUser, CurrentUserUseCase};
