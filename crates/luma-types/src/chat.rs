//! Chat turn types for Luma.
//!
//! A conversation is a flat, append-only list of turns per user. There are
//! no sessions: every turn a user ever exchanged with the assistant lives in
//! one ordered history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::llm::MessageRole;

/// One persisted message in a user's conversation.
///
/// Immutable once written. Ordered by `created_at` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// A new turn stamped with the current time.
    pub fn new(user_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// The pair of turns written for one completed exchange.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub user: ChatTurn,
    pub assistant: ChatTurn,
}

impl ChatExchange {
    /// Build both turns for `user_id`. The assistant turn is never stamped
    /// earlier than the user turn.
    pub fn new(user_id: Uuid, user_message: &str, reply: &str) -> Self {
        let user = ChatTurn::new(user_id, MessageRole::User, user_message);
        let mut assistant = ChatTurn::new(user_id, MessageRole::Assistant, reply);
        if assistant.created_at <= user.created_at {
            assistant.created_at = user.created_at + chrono::Duration::microseconds(1);
        }
        Self { user, assistant }
    }
}
