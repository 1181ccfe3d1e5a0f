//! Application error type mapping domain errors to HTTP responses.
//!
//! Every error body has the shape `{"error": message, "code": CODE}`.
//! Internal details are logged, never returned.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use luma_types::error::{AuthError, ChatError, RecordError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    Record(RecordError),
    Chat(ChatError),
    /// Missing or bad bearer credentials.
    Unauthorized(&'static str),
    /// Invalid request input.
    Validation(String),
    NotFound(String),
    /// The request body could not be read or decoded.
    Rejected { status: StatusCode, message: String },
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        AppError::Record(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(e: MultipartRejection) -> Self {
        AppError::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Rejected {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

/// Log `detail` and return a fixed public message.
fn internal(code: &'static str, message: &str, detail: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(code, error = %detail, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, code, message.to_string())
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Auth(e) => match e {
                AuthError::EmailTaken => (
                    StatusCode::CONFLICT,
                    "USER_EXISTS",
                    "User with this email already exists".to_string(),
                ),
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid email or password".to_string(),
                ),
                AuthError::EmailNotConfirmed => (
                    StatusCode::UNAUTHORIZED,
                    "EMAIL_NOT_CONFIRMED",
                    "Please confirm your email before logging in.".to_string(),
                ),
                AuthError::InvalidToken => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_TOKEN",
                    "Invalid or expired token".to_string(),
                ),
                AuthError::TokenExpired => (
                    StatusCode::BAD_REQUEST,
                    "TOKEN_EXPIRED",
                    "Token expired".to_string(),
                ),
                AuthError::WrongPassword => (
                    StatusCode::BAD_REQUEST,
                    "WRONG_PASSWORD",
                    "Current password is incorrect".to_string(),
                ),
                AuthError::UserNotFound => (
                    StatusCode::NOT_FOUND,
                    "USER_NOT_FOUND",
                    "User not found".to_string(),
                ),
                AuthError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                AuthError::Hashing(_) => internal("HASHING_ERROR", "Failed to hash password", e),
                AuthError::Session(_) => internal("TOKEN_ERROR", "Failed to generate token", e),
                AuthError::Mail(_) => {
                    internal("MAIL_ERROR", "Failed to send confirmation email", e)
                }
                AuthError::Storage(_) => internal("DATABASE_ERROR", "Database error", e),
            },

            AppError::Record(e) => match e {
                RecordError::NotFound => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Record not found".to_string(),
                ),
                RecordError::PhotoNotOwned => (
                    StatusCode::BAD_REQUEST,
                    "PHOTO_NOT_OWNED",
                    "Photo not found or not owned by user".to_string(),
                ),
                RecordError::PeopleNotOwned => (
                    StatusCode::BAD_REQUEST,
                    "PEOPLE_NOT_OWNED",
                    "One or more people not found or not owned by user".to_string(),
                ),
                RecordError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                RecordError::Storage(_) => internal("DATABASE_ERROR", "Database error", e),
                RecordError::Blob(_) => internal("PHOTO_STORE_ERROR", "Photo storage error", e),
            },

            AppError::Chat(e) => match e {
                ChatError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                ChatError::Config(_) => {
                    internal("CHAT_NOT_CONFIGURED", "Streaming not configured", e)
                }
                ChatError::Upstream(detail) => {
                    tracing::warn!(error = %detail, "completion upstream failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "Failed to generate response".to_string(),
                    )
                }
                ChatError::Persistence(_) => {
                    internal("PERSISTENCE_ERROR", "Failed to save chat messages", e)
                }
                ChatError::Context(_) => {
                    internal("CONTEXT_ERROR", "Failed to get user context", e)
                }
            },

            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Rejected { status, message } => {
                let code = if *status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "INVALID_BODY"
                };
                (*status, code, message.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
