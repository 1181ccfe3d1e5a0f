//! Memories: titled notes with optional photo and linked people.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use luma_types::memory::{Memory, MemoryDetail, NewMemory};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::json::ApiJson;
use crate::http::handlers::people::PersonResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryResponse {
    #[serde(flatten)]
    pub memory: Memory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub people: Vec<PersonResponse>,
}

impl MemoryResponse {
    fn new(state: &AppState, detail: MemoryDetail) -> Self {
        Self {
            photo_url: detail.photo_id.as_ref().map(|id| state.photo_url(id)),
            photo_id: detail.photo_id,
            people: detail
                .people
                .into_iter()
                .map(|person| PersonResponse {
                    photo_url: person.photo_id.as_ref().map(|id| state.photo_url(id)),
                    person,
                })
                .collect(),
            memory: detail.memory,
        }
    }
}

/// POST /api/v1/memories
pub async fn create_memory(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewMemory>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let detail = state.memory_service.create(&auth.user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "memory": MemoryResponse::new(&state, detail) })),
    ))
}

/// GET /api/v1/memories
pub async fn list_memories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let memories: Vec<MemoryResponse> = state
        .memory_service
        .list(&auth.user_id)
        .await?
        .into_iter()
        .map(|d| MemoryResponse::new(&state, d))
        .collect();
    Ok(Json(json!({ "memories": memories })))
}
