//! Photo service: uploads and owner-checked downloads.
//!
//! Bytes go to a [`PhotoStore`], metadata to a [`PhotoRepository`]. The blob
//! is written first; if the metadata insert then fails the blob is removed
//! again so no orphaned bytes are left.

use chrono::Utc;
use uuid::Uuid;

use luma_types::error::RecordError;
use luma_types::photo::{Photo, storage_key_for};

use crate::repository::photo::PhotoRepository;
use crate::storage::photo_store::PhotoStore;

pub struct PhotoService<Ph: PhotoRepository, S: PhotoStore> {
    photo_repo: Ph,
    store: S,
}

impl<Ph: PhotoRepository, S: PhotoStore> PhotoService<Ph, S> {
    pub fn new(photo_repo: Ph, store: S) -> Self {
        Self { photo_repo, store }
    }

    pub async fn upload(
        &self,
        user_id: &Uuid,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Photo, RecordError> {
        if data.is_empty() {
            return Err(RecordError::Validation("file is empty".to_string()));
        }

        let id = Uuid::now_v7();
        let photo = Photo {
            id,
            user_id: *user_id,
            memory_id: None,
            storage_key: storage_key_for(&id, filename),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            uploaded_at: Utc::now(),
        };

        self.store
            .put(&photo.storage_key, data)
            .await
            .map_err(|e| RecordError::Blob(e.to_string()))?;

        if let Err(e) = self.photo_repo.create(&photo).await {
            if let Err(cleanup) = self.store.delete(&photo.storage_key).await {
                tracing::warn!(
                    key = %photo.storage_key,
                    error = %cleanup,
                    "failed to remove photo bytes after metadata insert failed"
                );
            }
            return Err(e.into());
        }

        tracing::info!(
            user_id = %user_id,
            photo_id = %photo.id,
            size = data.len(),
            "stored photo"
        );
        Ok(photo)
    }

    /// Metadata and bytes of a photo owned by `user_id`.
    pub async fn fetch(&self, user_id: &Uuid, id: &Uuid) -> Result<(Photo, Vec<u8>), RecordError> {
        let photo = self
            .photo_repo
            .get_owned(user_id, id)
            .await?
            .ok_or(RecordError::PhotoNotOwned)?;
        let bytes = self
            .store
            .get(&photo.storage_key)
            .await
            .map_err(|e| RecordError::Blob(e.to_string()))?;
        Ok((photo, bytes))
    }

    /// Storage keys of everything `user_id` uploaded. Collected before an
    /// account is deleted, since the metadata rows go with it.
    pub async fn storage_keys(&self, user_id: &Uuid) -> Result<Vec<String>, RecordError> {
        Ok(self.photo_repo.storage_keys_for_user(user_id).await?)
    }

    /// Best-effort removal of stored bytes. Returns how many were removed.
    pub async fn remove_blobs(&self, keys: &[String]) -> usize {
        let mut removed = 0;
        for key in keys {
            match self.store.delete(key).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(key = %key, error = %e, "failed to remove photo bytes"),
            }
        }
        removed
    }
}
