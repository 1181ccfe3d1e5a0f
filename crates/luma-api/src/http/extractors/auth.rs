//! Bearer session authentication extractor.
//!
//! Reads `Authorization: Bearer <token>` and resolves it to the signed-in
//! user through the auth service. Any verification failure is a plain 401.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// The user a request is acting for.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state
            .auth_service
            .authenticate(token)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                AppError::Unauthorized("Invalid token")
            })?;
        Ok(AuthUser {
            user_id: user.user_id,
            email: user.email,
        })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized("Authorization header required"))?;
    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header format"))?;

    let mut pieces = value.split(' ');
    match (pieces.next(), pieces.next(), pieces.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::Unauthorized("Invalid authorization header format")),
    }
}
