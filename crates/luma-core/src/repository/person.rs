//! PersonRepository trait definition.

use luma_types::error::RepositoryError;
use luma_types::person::Person;
use uuid::Uuid;

/// Repository trait for a user's contacts.
pub trait PersonRepository: Send + Sync {
    fn create(
        &self,
        person: &Person,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All people owned by `user_id`, oldest first.
    fn list_for_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Person>, RepositoryError>> + Send;

    /// The subset of `ids` that exist and belong to `user_id`.
    fn get_owned(
        &self,
        user_id: &Uuid,
        ids: &[Uuid],
    ) -> impl std::future::Future<Output = Result<Vec<Person>, RepositoryError>> + Send;
}
