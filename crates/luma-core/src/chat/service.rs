//! Chat service: the single-shot and streaming chat use cases.
//!
//! Both modes build the same prompt (persona, the user's rendered context,
//! the message) and send it as one user message. Single-shot persists the
//! exchange right after the completion returns; streaming hands the event
//! stream to the relay, which persists once the reply is assembled.

use uuid::Uuid;

use luma_types::chat::{ChatExchange, ChatTurn};
use luma_types::error::ChatError;
use luma_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use crate::chat::context::ContextAssembler;
use crate::chat::prompt::PromptBuilder;
use crate::chat::relay::{self, FragmentSink, RelayError, RelayOutcome};
use crate::chat::repository::ChatRepository;
use crate::llm::provider::{CompletionProvider, EventStream};
use crate::repository::memory::MemoryRepository;
use crate::repository::person::PersonRepository;

/// Reply used in single-shot mode when the provider lacks credentials.
pub const NOT_CONFIGURED_REPLY: &str =
    "I'm sorry, but I'm not configured to respond right now. Please contact support.";

/// Completion parameters for chat requests.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f64,
    /// Output cap for single-shot replies.
    pub max_tokens: u32,
    /// Output cap for streamed replies.
    pub stream_max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-20241022".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            stream_max_tokens: 2000,
        }
    }
}

pub struct ChatService<C, L, M, P>
where
    C: ChatRepository,
    L: CompletionProvider,
    M: MemoryRepository,
    P: PersonRepository,
{
    chat_repo: C,
    provider: L,
    context: ContextAssembler<M, P>,
    settings: ChatSettings,
}

impl<C, L, M, P> ChatService<C, L, M, P>
where
    C: ChatRepository,
    L: CompletionProvider,
    M: MemoryRepository,
    P: PersonRepository,
{
    pub fn new(
        chat_repo: C,
        provider: L,
        context: ContextAssembler<M, P>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            chat_repo,
            provider,
            context,
            settings,
        }
    }

    async fn build_request(
        &self,
        user_id: &Uuid,
        message: &str,
        stream: bool,
    ) -> Result<CompletionRequest, ChatError> {
        let context = self.context.build_context(user_id).await?;
        Ok(CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: PromptBuilder::build(&context, message),
            }],
            max_tokens: if stream {
                self.settings.stream_max_tokens
            } else {
                self.settings.max_tokens
            },
            temperature: Some(self.settings.temperature),
            stream,
        })
    }

    fn check_message(message: &str) -> Result<(), ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation("message is required".to_string()));
        }
        Ok(())
    }

    /// Single-shot reply.
    ///
    /// A provider without credentials is not an error here: the canned
    /// apology is returned and persisted like any other reply.
    pub async fn reply(&self, user_id: &Uuid, message: &str) -> Result<String, ChatError> {
        Self::check_message(message)?;
        let request = self.build_request(user_id, message, false).await?;

        let reply = match self.provider.complete(&request).await {
            Ok(response) => response.content,
            Err(LlmError::NotConfigured(reason)) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    reason = %reason,
                    "completion provider not configured, sending canned reply"
                );
                NOT_CONFIGURED_REPLY.to_string()
            }
            Err(e) => return Err(e.into()),
        };

        let exchange = ChatExchange::new(*user_id, message, &reply);
        self.chat_repo
            .append_exchange(&exchange)
            .await
            .map_err(|e| ChatError::Persistence(e.to_string()))?;

        Ok(reply)
    }

    /// Open the upstream stream for `message`.
    ///
    /// Everything that can fail before the first fragment fails here, so the
    /// caller can still answer with a JSON error: missing configuration is a
    /// hard `Config` error in this mode.
    pub async fn open_stream(&self, user_id: &Uuid, message: &str) -> Result<EventStream, ChatError> {
        Self::check_message(message)?;
        let request = self.build_request(user_id, message, true).await?;
        let events = self.provider.stream(request).await?;
        tracing::debug!(user_id = %user_id, provider = self.provider.name(), "opened completion stream");
        Ok(events)
    }

    /// Relay an opened stream into `sink` and persist the result.
    pub async fn relay<K: FragmentSink>(
        &self,
        sink: &mut K,
        user_id: Uuid,
        message: &str,
        events: EventStream,
    ) -> Result<RelayOutcome, RelayError> {
        relay::relay(&self.chat_repo, sink, user_id, message, events).await
    }

    /// A user's turns, oldest first; `limit` keeps only the most recent.
    pub async fn history(&self, user_id: &Uuid, limit: Option<u32>) -> Result<Vec<ChatTurn>, ChatError> {
        if limit == Some(0) {
            return Err(ChatError::Validation("limit must be positive".to_string()));
        }
        self.chat_repo
            .history(user_id, limit)
            .await
            .map_err(|e| ChatError::Persistence(e.to_string()))
    }
}
