//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `luma-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, writes on the
//! single writer connection.

use chrono::{DateTime, Utc};
use luma_core::repository::user::UserRepository;
use luma_types::error::RepositoryError;
use luma_types::user::User;
use sqlx::Row;
use uuid::Uuid;

use super::pool::{DatabasePool, format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT * FROM users WHERE {column} = ?");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    display_name: String,
    email_confirmed: bool,
    confirmation_token_hash: Option<String>,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            display_name: row.try_get("display_name")?,
            email_confirmed: row.try_get("email_confirmed")?,
            confirmation_token_hash: row.try_get("confirmation_token_hash")?,
            reset_token_hash: row.try_get("reset_token_hash")?,
            reset_token_expires_at: row.try_get("reset_token_expires_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let reset_token_expires_at: Option<DateTime<Utc>> = self
            .reset_token_expires_at
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            email: self.email,
            password_hash: self.password_hash,
            display_name: self.display_name,
            email_confirmed: self.email_confirmed,
            confirmation_token_hash: self.confirmation_token_hash,
            reset_token_hash: self.reset_token_hash,
            reset_token_expires_at,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, display_name, email_confirmed, confirmation_token_hash, reset_token_hash, reset_token_expires_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.email_confirmed)
        .bind(&user.confirmation_token_hash)
        .bind(&user.reset_token_hash)
        .bind(user.reset_token_expires_at.as_ref().map(format_datetime))
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("email '{}' already registered", user.email))
            }
            other => RepositoryError::Query(other.to_string()),
        })?;

        Ok(())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("id", &id.to_string()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("email", email).await
    }

    async fn get_by_confirmation_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("confirmation_token_hash", token_hash)
            .await
    }

    async fn get_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("reset_token_hash", token_hash).await
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, password_hash = ?, display_name = ?, email_confirmed = ?,
                    confirmation_token_hash = ?, reset_token_hash = ?, reset_token_expires_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.email_confirmed)
        .bind(&user.confirmation_token_hash)
        .bind(&user.reset_token_hash)
        .bind(user.reset_token_expires_at.as_ref().map(format_datetime))
        .bind(format_datetime(&user.updated_at))
        .bind(user.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
