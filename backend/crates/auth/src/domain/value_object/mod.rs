//! Value Object Module

pub mod email;
pub mod ids;
pub mod refresh_secret;
