//! SQLite photo metadata repository implementation.

use luma_core::repository::photo::PhotoRepository;
use luma_types::error::RepositoryError;
use luma_types::photo::Photo;
use sqlx::Row;
use uuid::Uuid;

use super::pool::{DatabasePool, format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `PhotoRepository`.
pub struct SqlitePhotoRepository {
    pool: DatabasePool,
}

impl SqlitePhotoRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Photo.
struct PhotoRow {
    id: String,
    user_id: String,
    memory_id: Option<String>,
    storage_key: String,
    filename: String,
    content_type: String,
    uploaded_at: String,
}

impl PhotoRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            memory_id: row.try_get("memory_id")?,
            storage_key: row.try_get("storage_key")?,
            filename: row.try_get("filename")?,
            content_type: row.try_get("content_type")?,
            uploaded_at: row.try_get("uploaded_at")?,
        })
    }

    fn into_photo(self) -> Result<Photo, RepositoryError> {
        Ok(Photo {
            id: parse_uuid(&self.id, "photo id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            memory_id: self
                .memory_id
                .as_deref()
                .map(|id| parse_uuid(id, "memory_id"))
                .transpose()?,
            storage_key: self.storage_key,
            filename: self.filename,
            content_type: self.content_type,
            uploaded_at: parse_datetime(&self.uploaded_at)?,
        })
    }
}

impl PhotoRepository for SqlitePhotoRepository {
    async fn create(&self, photo: &Photo) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO photos (id, user_id, memory_id, storage_key, filename, content_type, uploaded_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(photo.id.to_string())
        .bind(photo.user_id.to_string())
        .bind(photo.memory_id.map(|id| id.to_string()))
        .bind(&photo.storage_key)
        .bind(&photo.filename)
        .bind(&photo.content_type)
        .bind(format_datetime(&photo.uploaded_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_owned(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Photo>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM photos WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let photo_row =
                    PhotoRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(photo_row.into_photo()?))
            }
            None => Ok(None),
        }
    }

    async fn storage_keys_for_user(&self, user_id: &Uuid) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT storage_key FROM photos WHERE user_id = ? ORDER BY uploaded_at")
                .bind(user_id.to_string())
                .fetch_all(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|(key,)| key).collect())
    }
}
