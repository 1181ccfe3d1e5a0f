//! CompletionProvider trait definition.
//!
//! The core abstraction the chat service talks to. Uses RPITIT for both
//! modes; the streaming mode resolves to a boxed stream once the upstream
//! has accepted the request, so a bad status surfaces before any event.

use std::pin::Pin;

use futures_util::Stream;

use luma_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// A live sequence of streaming events from a provider.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for completion provider backends.
///
/// Implementations live in luma-infra (e.g., `AnthropicProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a single-shot completion request and wait for the whole reply.
    ///
    /// Returns `LlmError::NotConfigured` without any network I/O when the
    /// provider lacks credentials or an endpoint.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Open a streaming completion.
    ///
    /// Resolves once the upstream answered with a success status. Errors
    /// that happen before that point (config, transport, status) are
    /// returned here; errors after it arrive as stream items.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> impl std::future::Future<Output = Result<EventStream, LlmError>> + Send;
}
