//! People the user wants to remember.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use luma_types::person::{NewPerson, Person};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    #[serde(flatten)]
    pub person: Person,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl PersonResponse {
    fn new(state: &AppState, person: Person) -> Self {
        let photo_url = person.photo_id.as_ref().map(|id| state.photo_url(id));
        Self { person, photo_url }
    }
}

/// POST /api/v1/people
pub async fn create_person(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewPerson>,
) -> Result<(StatusCode, Json<PersonResponse>), AppError> {
    let person = state.person_service.create(&auth.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(PersonResponse::new(&state, person))))
}

/// GET /api/v1/people
pub async fn list_people(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PersonResponse>>, AppError> {
    let people = state
        .person_service
        .list(&auth.user_id)
        .await?
        .into_iter()
        .map(|p| PersonResponse::new(&state, p))
        .collect();
    Ok(Json(people))
}
