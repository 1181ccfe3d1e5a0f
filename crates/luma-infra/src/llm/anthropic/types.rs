//! Anthropic Messages API types.
//!
//! These are Anthropic-specific request/response structures used for HTTP
//! communication with the Anthropic Messages API. They are NOT the generic
//! LLM types from luma-types -- those are provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for the Anthropic Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<AnthropicMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// A single message in an Anthropic conversation.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Non-streaming response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicNonStreamResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub content: Vec<AnthropicContentItem>,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: AnthropicUsage,
}

/// One item of a response's `content` array. Only `text` is read; other
/// item types deserialize with an empty text.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

// ---------------------------------------------------------------------------
// Streaming line payloads
//
// Every JSON record in the stream is read through this one loose shape: the
// outer `type` decides whether it matters, and only `content_block_delta`
// records with a text-bearing delta do.
// ---------------------------------------------------------------------------

/// A streamed JSON record.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub delta: Option<StreamDelta>,
}

/// The `delta` object of a `content_block_delta` record.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamDelta {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl StreamRecord {
    /// The text this record carries, if it is a text delta.
    pub fn text_delta(self) -> Option<String> {
        if self.kind != "content_block_delta" {
            return None;
        }
        match self.delta {
            Some(delta) if delta.kind == "text_delta" || delta.kind == "text" => Some(delta.text),
            _ => None,
        }
    }
}
