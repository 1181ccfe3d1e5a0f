//! OneTimeTokens trait for confirmation and reset tokens.
//!
//! Defined in luma-core so the auth service can mint and look up tokens
//! without coupling to a specific RNG or digest. The SHA-256 adapter lives
//! in luma-infra.

/// Mints random one-time tokens and derives the digest stored at rest.
pub trait OneTimeTokens: Send + Sync {
    /// A fresh, URL-safe random token. Only ever mailed, never stored.
    fn generate(&self) -> String;

    /// The digest persisted in place of `token`.
    fn digest(&self, token: &str) -> String;
}
