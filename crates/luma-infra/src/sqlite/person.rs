//! SQLite person repository implementation.

use luma_core::repository::person::PersonRepository;
use luma_types::error::RepositoryError;
use luma_types::person::Person;
use sqlx::Row;
use uuid::Uuid;

use super::pool::{DatabasePool, format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `PersonRepository`.
pub struct SqlitePersonRepository {
    pool: DatabasePool,
}

impl SqlitePersonRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Person.
pub(crate) struct PersonRow {
    id: String,
    user_id: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    relationship: String,
    notes: String,
    photo_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PersonRow {
    pub(crate) fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            relationship: row.try_get("relationship")?,
            notes: row.try_get("notes")?,
            photo_id: row.try_get("photo_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub(crate) fn into_person(self) -> Result<Person, RepositoryError> {
        Ok(Person {
            id: parse_uuid(&self.id, "person id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            relationship: self.relationship,
            notes: self.notes,
            photo_id: self
                .photo_id
                .as_deref()
                .map(|id| parse_uuid(id, "photo_id"))
                .transpose()?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

pub(crate) fn rows_to_people(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Person>, RepositoryError> {
    let mut people = Vec::with_capacity(rows.len());
    for row in rows {
        let person_row =
            PersonRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        people.push(person_row.into_person()?);
    }
    Ok(people)
}

impl PersonRepository for SqlitePersonRepository {
    async fn create(&self, person: &Person) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO people (id, user_id, first_name, last_name, email, phone, relationship, notes, photo_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(person.id.to_string())
        .bind(person.user_id.to_string())
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(&person.phone)
        .bind(&person.relationship)
        .bind(&person.notes)
        .bind(person.photo_id.map(|id| id.to_string()))
        .bind(format_datetime(&person.created_at))
        .bind(format_datetime(&person.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Person>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM people WHERE user_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_people(&rows)
    }

    async fn get_owned(&self, user_id: &Uuid, ids: &[Uuid]) -> Result<Vec<Person>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT * FROM people WHERE user_id = ? AND id IN ({placeholders}) ORDER BY created_at ASC, rowid ASC"
        );
        let mut query = sqlx::query(&sql).bind(user_id.to_string());
        for id in ids {
            query = query.bind(id.to_string());
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_people(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_support::{make_person, seed_user, test_pool};

    #[tokio::test]
    async fn test_create_and_list_in_creation_order() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "ada@example.com").await;
        let other = seed_user(&pool, "bob@example.com").await;
        let repo = SqlitePersonRepository::new(pool);

        repo.create(&make_person(user.id, "Mary")).await.unwrap();
        repo.create(&make_person(user.id, "Tom")).await.unwrap();
        repo.create(&make_person(other.id, "Eve")).await.unwrap();

        let people = repo.list_for_user(&user.id).await.unwrap();
        let names: Vec<&str> = people.iter().map(|p| p.first_name.as_str()).collect();
        assert_eq!(names, vec!["Mary", "Tom"]);
    }

    #[tokio::test]
    async fn test_get_owned_filters_foreign_and_unknown_ids() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "ada@example.com").await;
        let other = seed_user(&pool, "bob@example.com").await;
        let repo = SqlitePersonRepository::new(pool);

        let mary = make_person(user.id, "Mary");
        let eve = make_person(other.id, "Eve");
        repo.create(&mary).await.unwrap();
        repo.create(&eve).await.unwrap();

        let owned = repo
            .get_owned(&user.id, &[mary.id, eve.id, Uuid::now_v7()])
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, mary.id);

        assert!(repo.get_owned(&user.id, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_people_deleted_with_user() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "ada@example.com").await;
        let repo = SqlitePersonRepository::new(pool.clone());
        repo.create(&make_person(user.id, "Mary")).await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user.id.to_string())
            .execute(&pool.writer)
            .await
            .unwrap();

        assert!(repo.list_for_user(&user.id).await.unwrap().is_empty());
    }
}
