//! Mailer trait for transactional email.
//!
//! Implementations live in luma-infra: an SMTP transport and a logging
//! fallback for deployments without SMTP settings.

use luma_types::error::MailError;

/// Sends plain-text email.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> impl std::future::Future<Output = Result<(), MailError>> + Send;
}
