//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the smallest shared vocabulary of the backend:
//! - Transport-neutral error classification and the unified error value
//! - Typed identifiers
//!
//! Only things that carry the same meaning in every crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
