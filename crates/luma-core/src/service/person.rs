//! Person service: a user's contacts.

use chrono::Utc;
use uuid::Uuid;

use luma_types::error::RecordError;
use luma_types::person::{NewPerson, Person};

use crate::repository::person::PersonRepository;
use crate::repository::photo::PhotoRepository;
use crate::service::validate::{is_valid_email, required};

pub struct PersonService<P: PersonRepository, Ph: PhotoRepository> {
    person_repo: P,
    photo_repo: Ph,
}

impl<P: PersonRepository, Ph: PhotoRepository> PersonService<P, Ph> {
    pub fn new(person_repo: P, photo_repo: Ph) -> Self {
        Self {
            person_repo,
            photo_repo,
        }
    }

    /// Validate and store a new person for `user_id`.
    pub async fn create(&self, user_id: &Uuid, input: NewPerson) -> Result<Person, RecordError> {
        let first_name = required("firstName", &input.first_name).map_err(RecordError::Validation)?;
        let last_name = required("lastName", &input.last_name).map_err(RecordError::Validation)?;
        let email = required("email", &input.email).map_err(RecordError::Validation)?;
        let phone = required("phone", &input.phone).map_err(RecordError::Validation)?;
        let relationship =
            required("relationship", &input.relationship).map_err(RecordError::Validation)?;
        if !is_valid_email(&email) {
            return Err(RecordError::Validation("email is not valid".to_string()));
        }

        if let Some(photo_id) = input.photo_id {
            self.photo_repo
                .get_owned(user_id, &photo_id)
                .await?
                .ok_or(RecordError::PhotoNotOwned)?;
        }

        let now = Utc::now();
        let person = Person {
            id: Uuid::now_v7(),
            user_id: *user_id,
            first_name,
            last_name,
            email,
            phone,
            relationship,
            notes: input.notes.trim().to_string(),
            photo_id: input.photo_id,
            created_at: now,
            updated_at: now,
        };
        self.person_repo.create(&person).await?;
        tracing::debug!(user_id = %user_id, person_id = %person.id, "created person");
        Ok(person)
    }

    pub async fn list(&self, user_id: &Uuid) -> Result<Vec<Person>, RecordError> {
        Ok(self.person_repo.list_for_user(user_id).await?)
    }
}
