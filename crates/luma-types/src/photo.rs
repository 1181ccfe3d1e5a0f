//! Photo metadata types for Luma. The bytes live in a `PhotoStore`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for an uploaded photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub memory_id: Option<Uuid>,
    /// Key under which the bytes are held, e.g. `photos/<uuid>.jpg`.
    pub storage_key: String,
    pub filename: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Build the storage key for a new upload, keeping the original extension.
pub fn storage_key_for(id: &Uuid, filename: &str) -> String {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    format!("photos/{id}{ext}")
}
