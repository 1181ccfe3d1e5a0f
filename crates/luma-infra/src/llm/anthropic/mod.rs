//! Anthropic Claude completion provider.
//!
//! [`AnthropicProvider`] implements the
//! [`CompletionProvider`](luma_core::llm::provider::CompletionProvider)
//! trait for the Messages API, in both single-shot and streaming modes.

pub mod client;
pub mod streaming;
pub mod types;

pub use client::AnthropicProvider;
