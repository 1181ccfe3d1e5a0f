//! Memory service.
//!
//! Every reference a new memory makes (people, photo) is checked against the
//! caller's ownership before anything is written, so a rejected request
//! leaves no partial rows behind.

use chrono::Utc;
use uuid::Uuid;

use luma_types::error::RecordError;
use luma_types::memory::{Memory, MemoryDetail, NewMemory};

use crate::repository::memory::MemoryRepository;
use crate::repository::person::PersonRepository;
use crate::repository::photo::PhotoRepository;
use crate::service::validate::required;

pub struct MemoryService<M, P, Ph>
where
    M: MemoryRepository,
    P: PersonRepository,
    Ph: PhotoRepository,
{
    memory_repo: M,
    person_repo: P,
    photo_repo: Ph,
}

impl<M, P, Ph> MemoryService<M, P, Ph>
where
    M: MemoryRepository,
    P: PersonRepository,
    Ph: PhotoRepository,
{
    pub fn new(memory_repo: M, person_repo: P, photo_repo: Ph) -> Self {
        Self {
            memory_repo,
            person_repo,
            photo_repo,
        }
    }

    pub async fn create(&self, user_id: &Uuid, input: NewMemory) -> Result<MemoryDetail, RecordError> {
        let title = required("title", &input.title).map_err(RecordError::Validation)?;
        let memory_type = required("type", &input.memory_type).map_err(RecordError::Validation)?;
        let content = required("content", &input.content).map_err(RecordError::Validation)?;

        if let Some(photo_id) = input.photo_id {
            self.photo_repo
                .get_owned(user_id, &photo_id)
                .await?
                .ok_or(RecordError::PhotoNotOwned)?;
        }

        let mut people_ids = input.people_ids;
        people_ids.sort();
        people_ids.dedup();
        let people = if people_ids.is_empty() {
            Vec::new()
        } else {
            let owned = self.person_repo.get_owned(user_id, &people_ids).await?;
            if owned.len() != people_ids.len() {
                return Err(RecordError::PeopleNotOwned);
            }
            owned
        };

        let memory = Memory {
            id: Uuid::now_v7(),
            user_id: *user_id,
            title,
            memory_type,
            content,
            created_at: Utc::now(),
        };
        self.memory_repo
            .create(&memory, &people_ids, input.photo_id.as_ref())
            .await?;
        tracing::debug!(
            user_id = %user_id,
            memory_id = %memory.id,
            people = people.len(),
            "created memory"
        );

        Ok(MemoryDetail {
            memory,
            people,
            photo_id: input.photo_id,
        })
    }

    /// A user's memories, newest first.
    pub async fn list(&self, user_id: &Uuid) -> Result<Vec<MemoryDetail>, RecordError> {
        Ok(self.memory_repo.list_for_user(user_id).await?)
    }
}
