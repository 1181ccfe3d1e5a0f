//! Endpoints for the signed-in user's own account.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use luma_types::user::UserProfile;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// GET /api/v1/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let user = state.auth_service.profile(&auth.user_id).await?;
    Ok(Json(json!(UserProfile::from(&user))))
}

/// PUT /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .auth_service
        .update_display_name(&auth.user_id, &body.display_name)
        .await?;
    Ok(Json(json!({
        "user": UserProfile::from(&user),
        "message": "Profile updated successfully",
    })))
}

/// PUT /api/v1/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .auth_service
        .change_password(&auth.user_id, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// DELETE /api/v1/profile
///
/// Rows cascade with the account; stored photo bytes are collected first
/// and removed afterwards on a best-effort basis.
pub async fn delete_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let keys = state.photo_service.storage_keys(&auth.user_id).await?;
    state.auth_service.delete_account(&auth.user_id).await?;

    let removed = state.photo_service.remove_blobs(&keys).await;
    tracing::info!(
        user_id = %auth.user_id,
        photos = keys.len(),
        removed,
        "removed stored photos of deleted account"
    );

    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
