//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, SHA-256, Base64, constant-time comparison)
//! - Refresh-token secret hashing
//! - Password hashing (PBKDF2-HMAC-SHA256)

pub mod crypto;
pub mod password;
