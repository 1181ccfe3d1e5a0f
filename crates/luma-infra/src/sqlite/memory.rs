//! SQLite memory repository implementation.
//!
//! A memory's links live in two places: `memory_people` rows for the
//! people it references, and `photos.memory_id` for its photo. Creation
//! writes all of them in one transaction.

use std::collections::HashMap;

use luma_core::repository::memory::MemoryRepository;
use luma_types::error::RepositoryError;
use luma_types::memory::{Memory, MemoryDetail};
use luma_types::person::Person;
use sqlx::Row;
use uuid::Uuid;

use super::person::PersonRow;
use super::pool::{DatabasePool, format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `MemoryRepository`.
pub struct SqliteMemoryRepository {
    pool: DatabasePool,
}

impl SqliteMemoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Memory.
struct MemoryRow {
    id: String,
    user_id: String,
    title: String,
    memory_type: String,
    content: String,
    created_at: String,
}

impl MemoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            memory_type: row.try_get("memory_type")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_memory(self) -> Result<Memory, RepositoryError> {
        Ok(Memory {
            id: parse_uuid(&self.id, "memory id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            title: self.title,
            memory_type: self.memory_type,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl MemoryRepository for SqliteMemoryRepository {
    async fn create(
        &self,
        memory: &Memory,
        people_ids: &[Uuid],
        photo_id: Option<&Uuid>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO memories (id, user_id, title, memory_type, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(memory.id.to_string())
        .bind(memory.user_id.to_string())
        .bind(&memory.title)
        .bind(&memory.memory_type)
        .bind(&memory.content)
        .bind(format_datetime(&memory.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for person_id in people_ids {
            sqlx::query("INSERT OR IGNORE INTO memory_people (memory_id, person_id) VALUES (?, ?)")
                .bind(memory.id.to_string())
                .bind(person_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        if let Some(photo_id) = photo_id {
            let result = sqlx::query("UPDATE photos SET memory_id = ? WHERE id = ? AND user_id = ?")
                .bind(memory.id.to_string())
                .bind(photo_id.to_string())
                .bind(memory.user_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

            // Dropping the transaction rolls the memory back.
            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<MemoryDetail>, RepositoryError> {
        let memory_rows = sqlx::query(
            "SELECT * FROM memories WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let link_rows = sqlx::query(
            "SELECT mp.memory_id AS link_memory_id, p.*
             FROM memory_people mp
             JOIN people p ON p.id = mp.person_id
             JOIN memories m ON m.id = mp.memory_id
             WHERE m.user_id = ?
             ORDER BY p.created_at ASC, p.rowid ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let photo_rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT memory_id, id FROM photos
             WHERE user_id = ? AND memory_id IS NOT NULL
             ORDER BY uploaded_at ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut people_by_memory: HashMap<String, Vec<Person>> = HashMap::new();
        for row in &link_rows {
            let memory_id: String = row
                .try_get("link_memory_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let person = PersonRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_person()?;
            people_by_memory.entry(memory_id).or_default().push(person);
        }

        // First photo attached wins.
        let mut photo_by_memory: HashMap<String, String> = HashMap::new();
        for (memory_id, photo_id) in photo_rows {
            photo_by_memory.entry(memory_id).or_insert(photo_id);
        }

        let mut details = Vec::with_capacity(memory_rows.len());
        for row in &memory_rows {
            let memory_row =
                MemoryRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            let people = people_by_memory.remove(&memory_row.id).unwrap_or_default();
            let photo_id = photo_by_memory
                .get(&memory_row.id)
                .map(|id| parse_uuid(id, "photo id"))
                .transpose()?;
            details.push(MemoryDetail {
                memory: memory_row.into_memory()?,
                people,
                photo_id,
            });
        }

        Ok(details)
    }
}
