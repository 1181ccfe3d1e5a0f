//! Cryptographic operations for Luma.
//!
//! - `password`: Argon2id password hashing
//! - `hash`: one-time tokens stored as SHA-256 digests
//! - `jwt`: HS256 session tokens

pub mod hash;
pub mod jwt;
pub mod password;
