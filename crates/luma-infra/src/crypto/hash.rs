//! One-time tokens for email confirmation and password reset.
//!
//! Implements the `OneTimeTokens` trait from `luma-core` using the `sha2`
//! crate (RustCrypto ecosystem). Tokens are 32 random bytes, hex encoded;
//! only their SHA-256 digest is ever stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

use luma_core::service::hash::OneTimeTokens;

/// Number of random bytes in a token before hex encoding.
const TOKEN_BYTES: usize = 32;

/// SHA-256 backed implementation of `OneTimeTokens`.
pub struct Sha256OneTimeTokens;

impl Sha256OneTimeTokens {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256OneTimeTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl OneTimeTokens for Sha256OneTimeTokens {
    fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    fn digest(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}
