//! CredentialHasher trait for password storage.
//!
//! The Argon2id adapter lives in luma-infra.

use luma_types::error::AuthError;

/// Hashes and verifies user passwords.
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash string (PHC format) for `password`.
    fn hash_password(&self, password: &str) -> Result<String, AuthError>;

    /// Check `password` against a stored hash. Malformed hashes never verify.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
