//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod jwt;
pub mod memory;
pub mod postgres;

pub use jwt::JwtIssuer;
pub use memory::InMemoryAuthRepository;
pub use postgres::PgAuthRepository;
