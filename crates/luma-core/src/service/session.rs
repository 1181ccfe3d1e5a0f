//! SessionTokens trait for bearer tokens handed out at login.
//!
//! The JWT adapter lives in luma-infra.

use luma_types::error::AuthError;
use luma_types::user::{AuthenticatedUser, User};

/// Issues and verifies bearer session tokens.
pub trait SessionTokens: Send + Sync {
    fn issue(&self, user: &User) -> Result<String, AuthError>;

    /// Resolve a presented token. Fails with `InvalidToken` or `TokenExpired`.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
