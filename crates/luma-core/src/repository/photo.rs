//! PhotoRepository trait definition.

use luma_types::error::RepositoryError;
use luma_types::photo::Photo;
use uuid::Uuid;

/// Repository trait for photo metadata.
pub trait PhotoRepository: Send + Sync {
    fn create(
        &self,
        photo: &Photo,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The photo if it exists and belongs to `user_id`.
    fn get_owned(
        &self,
        user_id: &Uuid,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Photo>, RepositoryError>> + Send;

    /// Storage keys of every photo owned by `user_id`.
    fn storage_keys_for_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
