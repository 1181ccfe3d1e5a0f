//! ChatRepository trait definition.
//!
//! Chat turns are append-only: the only write is a whole exchange, and the
//! only read is a user's history in creation order.

use luma_types::chat::{ChatExchange, ChatTurn};
use luma_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat turn persistence.
///
/// Implementations live in luma-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Persist both turns of an exchange in one transaction. Either both
    /// rows exist afterwards or neither does.
    fn append_exchange(
        &self,
        exchange: &ChatExchange,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// A user's turns, oldest first.
    ///
    /// With `limit`, only the `limit` most recent turns are returned, still
    /// oldest first.
    fn history(
        &self,
        user_id: &Uuid,
        limit: Option<u32>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;
}
