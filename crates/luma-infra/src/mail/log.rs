//! Mailer that only logs. Used when no SMTP host is configured.

use luma_core::service::mail::Mailer;
use luma_types::error::MailError;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        tracing::info!(to, subject, "mail not sent (no SMTP host configured)");
        // Links carry one-time tokens, so the body stays at debug.
        tracing::debug!(to, body, "unsent mail body");
        Ok(())
    }
}
