//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AccessTokenValidator, AuthenticatedUser, require_bearer};
pub use router::{auth_router, auth_router_generic};
