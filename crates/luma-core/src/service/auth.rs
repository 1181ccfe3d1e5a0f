//! Account and authentication service.
//!
//! Covers the full account lifecycle: registration with email confirmation,
//! login, password reset by mailed token, profile edits, password change
//! and account deletion. Also resolves bearer tokens to users for the HTTP
//! extractor.

use chrono::{Duration, Utc};
use uuid::Uuid;

use luma_types::error::AuthError;
use luma_types::user::{AuthenticatedUser, User};

use crate::repository::user::UserRepository;
use crate::service::hash::OneTimeTokens;
use crate::service::mail::Mailer;
use crate::service::password::CredentialHasher;
use crate::service::session::SessionTokens;
use crate::service::validate::{MIN_PASSWORD_LEN, is_valid_email, required};

/// Settings the auth service needs from configuration.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Base URL for links in outgoing mail.
    pub frontend_url: String,
    /// Lifetime of a password reset token.
    pub reset_token_ttl: Duration,
}

/// Service orchestrating accounts, credentials and tokens.
///
/// Generic over its ports so luma-core never depends on luma-infra.
pub struct AuthService<U, C, T, S, M>
where
    U: UserRepository,
    C: CredentialHasher,
    T: OneTimeTokens,
    S: SessionTokens,
    M: Mailer,
{
    user_repo: U,
    hasher: C,
    tokens: T,
    sessions: S,
    mailer: M,
    settings: AuthSettings,
}

impl<U, C, T, S, M> AuthService<U, C, T, S, M>
where
    U: UserRepository,
    C: CredentialHasher,
    T: OneTimeTokens,
    S: SessionTokens,
    M: Mailer,
{
    pub fn new(
        user_repo: U,
        hasher: C,
        tokens: T,
        sessions: S,
        mailer: M,
        settings: AuthSettings,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
            sessions,
            mailer,
            settings,
        }
    }

    fn link(&self, path: &str, token: &str) -> String {
        format!(
            "{}/{path}?token={token}",
            self.settings.frontend_url.trim_end_matches('/')
        )
    }

    fn check_password(password: &str) -> Result<(), AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Register a new, unconfirmed account and mail its confirmation link.
    ///
    /// The account is stored before the mail is sent; a delivery failure is
    /// reported but does not roll the account back.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AuthError::Validation("a valid email is required".to_string()));
        }
        Self::check_password(password)?;
        let display_name = required("displayName", display_name).map_err(AuthError::Validation)?;

        if self.user_repo.get_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let confirmation_token = self.tokens.generate();
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email,
            password_hash: self.hasher.hash_password(password)?,
            display_name,
            email_confirmed: false,
            confirmation_token_hash: Some(self.tokens.digest(&confirmation_token)),
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        self.user_repo.create(&user).await?;
        tracing::info!(user_id = %user.id, "registered new account");

        let body = format!(
            "Please confirm your email by clicking the following link: {}",
            self.link("confirm", &confirmation_token)
        );
        self.mailer
            .send(&user.email, "Confirm your email", &body)
            .await?;

        Ok(user)
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = email.trim().to_lowercase();
        let user = self
            .user_repo
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.email_confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let token = self.sessions.issue(&user)?;
        tracing::debug!(user_id = %user.id, "login succeeded");
        Ok((user, token))
    }

    /// Mark the account holding `token` as confirmed. Tokens are single use.
    pub async fn confirm_email(&self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Validation("token is required".to_string()));
        }

        let mut user = self
            .user_repo
            .get_by_confirmation_token(&self.tokens.digest(token))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        user.email_confirmed = true;
        user.confirmation_token_hash = None;
        user.updated_at = Utc::now();
        self.user_repo.update(&user).await?;
        tracing::info!(user_id = %user.id, "email confirmed");
        Ok(())
    }

    /// Start a password reset.
    ///
    /// Succeeds whether or not the address is known so callers cannot probe
    /// for accounts. Mail failures are logged only.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AuthError::Validation("a valid email is required".to_string()));
        }

        let Some(mut user) = self.user_repo.get_by_email(&email).await? else {
            tracing::debug!("password reset requested for unknown address");
            return Ok(());
        };

        let reset_token = self.tokens.generate();
        let now = Utc::now();
        user.reset_token_hash = Some(self.tokens.digest(&reset_token));
        user.reset_token_expires_at = Some(now + self.settings.reset_token_ttl);
        user.updated_at = now;
        self.user_repo.update(&user).await?;

        let body = format!(
            "Click the following link to reset your password: {}",
            self.link("reset-password", &reset_token)
        );
        if let Err(e) = self
            .mailer
            .send(&user.email, "Reset your password", &body)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "failed to send password reset mail");
        }
        Ok(())
    }

    /// Finish a password reset with the mailed token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Validation("token is required".to_string()));
        }
        Self::check_password(new_password)?;

        let mut user = self
            .user_repo
            .get_by_reset_token(&self.tokens.digest(token))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let now = Utc::now();
        match user.reset_token_expires_at {
            Some(expires_at) if expires_at > now => {}
            _ => return Err(AuthError::TokenExpired),
        }

        user.password_hash = self.hasher.hash_password(new_password)?;
        user.reset_token_hash = None;
        user.reset_token_expires_at = None;
        user.updated_at = now;
        self.user_repo.update(&user).await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }

    /// Resolve a bearer token to a live account.
    ///
    /// Tokens for deleted accounts are rejected even if their signature is
    /// still valid.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let identity = self.sessions.verify(token)?;
        match self.user_repo.get_by_id(&identity.user_id).await? {
            Some(_) => Ok(identity),
            None => Err(AuthError::InvalidToken),
        }
    }

    pub async fn profile(&self, user_id: &Uuid) -> Result<User, AuthError> {
        self.user_repo
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update_display_name(
        &self,
        user_id: &Uuid,
        display_name: &str,
    ) -> Result<User, AuthError> {
        let display_name = required("displayName", display_name).map_err(AuthError::Validation)?;
        let mut user = self.profile(user_id).await?;
        user.display_name = display_name;
        user.updated_at = Utc::now();
        self.user_repo.update(&user).await?;
        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut user = self.profile(user_id).await?;
        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)
        {
            return Err(AuthError::WrongPassword);
        }
        Self::check_password(new_password)?;

        user.password_hash = self.hasher.hash_password(new_password)?;
        user.updated_at = Utc::now();
        self.user_repo.update(&user).await?;
        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }

    pub async fn delete_account(&self, user_id: &Uuid) -> Result<(), AuthError> {
        self.user_repo.delete(user_id).await?;
        tracing::info!(user_id = %user_id, "account deleted");
        Ok(())
    }
}
