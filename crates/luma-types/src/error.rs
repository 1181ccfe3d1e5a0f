use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in luma-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to accounts, credentials and one-time tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email address not confirmed")]
    EmailNotConfirmed,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("current password is incorrect")]
    WrongPassword,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("session token error: {0}")]
    Session(String),

    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AuthError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => AuthError::UserNotFound,
            RepositoryError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Storage(other.to_string()),
        }
    }
}

/// Outbound mail could not be handed to the transport.
#[derive(Debug, Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

impl From<MailError> for AuthError {
    fn from(e: MailError) -> Self {
        AuthError::Mail(e.0)
    }
}

/// Errors related to memories, people and photos.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record not found")]
    NotFound,

    #[error("photo not found or not owned by user")]
    PhotoNotOwned,

    #[error("one or more people not found or not owned by user")]
    PeopleNotOwned,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("photo store error: {0}")]
    Blob(String),
}

impl From<RepositoryError> for RecordError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => RecordError::NotFound,
            other => RecordError::Storage(other.to_string()),
        }
    }
}

/// Errors from the chat pipeline.
///
/// `Config` is soft in single-shot mode (the service substitutes a canned
/// reply) and hard in streaming mode.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat is not configured: {0}")]
    Config(String),

    #[error("upstream completion failed: {0}")]
    Upstream(String),

    #[error("failed to persist chat turns: {0}")]
    Persistence(String),

    #[error("failed to load user context: {0}")]
    Context(String),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl From<LlmError> for ChatError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::NotConfigured(msg) => ChatError::Config(msg),
            other => ChatError::Upstream(other.to_string()),
        }
    }
}
