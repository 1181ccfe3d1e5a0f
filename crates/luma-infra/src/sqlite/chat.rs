//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `luma-core` using sqlx with split
//! read/write pools. Turns are ordered by `created_at`, with `rowid` as the
//! tiebreaker so two turns stamped in the same microsecond keep their
//! insertion order.

use luma_core::chat::repository::ChatRepository;
use luma_types::chat::{ChatExchange, ChatTurn, MessageRole};
use luma_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::{DatabasePool, format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatTurn.
struct ChatTurnRow {
    id: String,
    user_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatTurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatTurn {
            id: parse_uuid(&self.id, "turn id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ChatRepository for SqliteChatRepository {
    async fn append_exchange(&self, exchange: &ChatExchange) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for turn in [&exchange.user, &exchange.assistant] {
            sqlx::query(
                "INSERT INTO chat_turns (id, user_id, role, content, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(turn.id.to_string())
            .bind(turn.user_id.to_string())
            .bind(turn.role.to_string())
            .bind(&turn.content)
            .bind(format_datetime(&turn.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn history(
        &self,
        user_id: &Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let rows = match limit {
            // Take the newest N, then flip back to chronological order.
            Some(limit) => sqlx::query(
                "SELECT * FROM (
                     SELECT rowid AS seq, * FROM chat_turns
                     WHERE user_id = ?
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?
                 ) ORDER BY created_at ASC, seq ASC",
            )
            .bind(user_id.to_string())
            .bind(i64::from(limit))
            .fetch_all(&self.pool.reader)
            .await,
            None => sqlx::query(
                "SELECT * FROM chat_turns WHERE user_id = ? ORDER BY created_at ASC, rowid ASC",
            )
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await,
        }
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                ChatTurnRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }
        Ok(turns)
    }
}
