//! Memory types for Luma.
//!
//! A memory is a titled free-text entry ("a trip", "a birthday") that can
//! reference people and carry one photo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::person::Person;

/// A stored memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub memory_type: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A memory together with the people it references and its photo, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDetail {
    pub memory: Memory,
    pub people: Vec<Person>,
    pub photo_id: Option<Uuid>,
}

/// Input for creating a memory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemory {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub memory_type: String,
    #[serde(default)]
    pub content: String,
    pub photo_id: Option<Uuid>,
    #[serde(default)]
    pub people_ids: Vec<Uuid>,
}
