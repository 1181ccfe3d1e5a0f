//! Unauthenticated account endpoints: registration, email confirmation,
//! login and password reset.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use luma_types::user::UserProfile;

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default, alias = "newPassword")]
    pub password: String,
}

fn require_token(token: Option<&str>) -> Result<&str, AppError> {
    match token.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(AppError::Validation("Token is required".to_string())),
    }
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = state
        .auth_service
        .register(&body.email, &body.password, &body.display_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": UserProfile::from(&user),
            "message": "Registration successful. Please check your email to confirm your account.",
        })),
    ))
}

/// GET or POST /api/v1/auth/confirm?token=...
pub async fn confirm_email(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Value>, AppError> {
    let token = require_token(query.token.as_deref())?;
    state.auth_service.confirm_email(token).await?;
    Ok(Json(json!({
        "message": "Email confirmed successfully. You can now log in.",
    })))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let (user, token) = state.auth_service.login(&body.email, &body.password).await?;
    Ok(Json(json!({
        "user": UserProfile::from(&user),
        "token": token,
    })))
}

/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    state.auth_service.request_password_reset(&body.email).await?;
    Ok(Json(json!({
        "message": "If the email exists, a reset link has been sent.",
    })))
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let token = require_token(Some(body.token.as_str()))?;
    state
        .auth_service
        .reset_password(token, &body.password)
        .await?;
    Ok(Json(json!({
        "message": "Password reset successful. You can now log in.",
    })))
}
