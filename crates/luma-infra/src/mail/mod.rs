//! Outbound mail.
//!
//! [`AppMailer`] picks the transport once at startup: SMTP when a host is
//! configured, otherwise a logging stand-in so local development works
//! without a relay.

pub mod log;
pub mod smtp;

use luma_core::service::mail::Mailer;
use luma_types::config::MailConfig;
use luma_types::error::MailError;

pub use self::log::LogMailer;
pub use self::smtp::SmtpMailer;

/// The mailer the application runs with.
pub enum AppMailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl AppMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        match config.smtp_host.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => {
                tracing::info!(host, port = config.smtp_port, "sending mail over SMTP");
                Ok(Self::Smtp(SmtpMailer::new(host, config)?))
            }
            None => {
                tracing::info!("no SMTP host configured, mail will be logged instead of sent");
                Ok(Self::Log(LogMailer))
            }
        }
    }

    pub fn transport(&self) -> &'static str {
        match self {
            Self::Smtp(_) => "smtp",
            Self::Log(_) => "log",
        }
    }
}

impl Mailer for AppMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        match self {
            Self::Smtp(mailer) => mailer.send(to, subject, body).await,
            Self::Log(mailer) => mailer.send(to, subject, body).await,
        }
    }
}
