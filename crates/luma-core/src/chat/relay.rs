//! Streaming relay.
//!
//! Consumes a provider's event stream, forwards each text fragment to the
//! caller through a [`FragmentSink`] as it arrives, and persists the
//! exchange once the reply is assembled. Every delta is its own event,
//! empty ones included.
//!
//! End-of-stream rules:
//! - `Done` or end of stream: persist if anything was accumulated.
//! - Upstream error mid-stream: persist the partial reply, then abort the
//!   sink so the caller sees an abrupt close.
//! - Sink closed (caller went away): stop, persist nothing.

use futures_util::StreamExt;
use uuid::Uuid;

use luma_types::chat::ChatExchange;
use luma_types::llm::{LlmError, StreamEvent};

use crate::chat::repository::ChatRepository;
use crate::llm::provider::EventStream;

/// The receiving side of a relay went away.
#[derive(Debug, thiserror::Error)]
#[error("fragment sink closed")]
pub struct SinkClosed;

/// Where escaped fragments are delivered, one event per fragment.
pub trait FragmentSink: Send {
    /// Deliver one already-escaped fragment and flush it.
    fn send(
        &mut self,
        fragment: String,
    ) -> impl std::future::Future<Output = Result<(), SinkClosed>> + Send;

    /// Terminate the delivery abruptly without a structured error frame.
    fn abort(&mut self, reason: &str) -> impl std::future::Future<Output = ()> + Send;
}

/// How a relay run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Fragments delivered to the sink.
    pub fragments: usize,
    /// Whether the exchange was written.
    pub persisted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("client disconnected")]
    ClientGone,

    #[error("upstream stream failed: {0}")]
    Upstream(LlmError),
}

/// Escape a fragment for one SSE `data:` line: line breaks become the two
/// characters `\n` / `\r`.
pub fn escape_fragment(text: &str) -> String {
    text.replace('\n', "\\n").replace('\r', "\\r")
}

/// Run one relay to completion.
pub async fn relay<R, K>(
    repo: &R,
    sink: &mut K,
    user_id: Uuid,
    user_message: &str,
    mut events: EventStream,
) -> Result<RelayOutcome, RelayError>
where
    R: ChatRepository,
    K: FragmentSink,
{
    let mut reply = String::new();
    let mut fragments = 0usize;
    let mut failure = None;

    while let Some(event) = events.next().await {
        match event {
            Ok(StreamEvent::TextDelta { text }) => {
                if sink.send(escape_fragment(&text)).await.is_err() {
                    tracing::info!(
                        user_id = %user_id,
                        fragments,
                        "client disconnected mid-stream, discarding reply"
                    );
                    return Err(RelayError::ClientGone);
                }
                reply.push_str(&text);
                fragments += 1;
            }
            Ok(StreamEvent::Done) => break,
            Err(e) => {
                tracing::warn!(user_id = %user_id, fragments, error = %e, "upstream stream failed");
                failure = Some(e);
                break;
            }
        }
    }

    let persisted = persist(repo, user_id, user_message, &reply).await;

    match failure {
        Some(e) => {
            sink.abort(&e.to_string()).await;
            Err(RelayError::Upstream(e))
        }
        None => {
            tracing::debug!(user_id = %user_id, fragments, persisted, "relay finished");
            Ok(RelayOutcome {
                fragments,
                persisted,
            })
        }
    }
}

async fn persist<R: ChatRepository>(repo: &R, user_id: Uuid, user_message: &str, reply: &str) -> bool {
    if reply.is_empty() {
        return false;
    }
    let exchange = ChatExchange::new(user_id, user_message, reply);
    match repo.append_exchange(&exchange).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "failed to persist streamed exchange");
            false
        }
    }
}
