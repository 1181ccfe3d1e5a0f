//! MemoryRepository trait definition.

use luma_types::error::RepositoryError;
use luma_types::memory::{Memory, MemoryDetail};
use uuid::Uuid;

/// Repository trait for memories and their links to people and photos.
pub trait MemoryRepository: Send + Sync {
    /// Insert the memory, its people links and the photo attachment in one
    /// transaction. Ownership of `people_ids` and `photo_id` is checked by
    /// the caller.
    fn create(
        &self,
        memory: &Memory,
        people_ids: &[Uuid],
        photo_id: Option<&Uuid>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All memories owned by `user_id`, newest first, with people and photo.
    fn list_for_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryDetail>, RepositoryError>> + Send;
}
