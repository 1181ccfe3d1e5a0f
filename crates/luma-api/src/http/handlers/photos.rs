//! Photo upload and owner-checked download.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::extract::multipart::MultipartRejection;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use uuid::Uuid;

use luma_types::error::RecordError;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

/// POST /api/v1/upload-photo (multipart, field `file`)
pub async fn upload_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = match field.content_type() {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
            _ => mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };
        let data = field.bytes().await?;

        let photo = state
            .photo_service
            .upload(&auth.user_id, &filename, &content_type, &data)
            .await?;

        return Ok(Json(json!({
            "id": photo.id,
            "key": photo.storage_key,
            "message": "Photo uploaded successfully",
        })));
    }

    Err(AppError::Validation("File is required".to_string()))
}

/// GET /api/v1/photos/{id}
pub async fn get_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id: Uuid = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid photo ID format".to_string()))?;

    let (photo, bytes) = match state.photo_service.fetch(&auth.user_id, &id).await {
        Ok(found) => found,
        Err(RecordError::PhotoNotOwned) => {
            return Err(AppError::NotFound(
                "Photo not found or not owned by user".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        [
            (CONTENT_TYPE, photo.content_type),
            (CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        bytes,
    )
        .into_response())
}
