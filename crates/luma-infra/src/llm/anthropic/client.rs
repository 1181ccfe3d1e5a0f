//! AnthropicProvider -- concrete [`CompletionProvider`] for the Anthropic
//! Messages API.
//!
//! The endpoint URL and API key both come from configuration and are
//! optional: without either, every call returns [`LlmError::NotConfigured`]
//! before touching the network.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building request headers.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;

use luma_core::llm::provider::{CompletionProvider, EventStream};
use luma_types::config::AnthropicConfig;
use luma_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::streaming::response_event_stream;
use super::types::{AnthropicMessage, AnthropicNonStreamResponse, AnthropicRequest};

/// Anthropic Claude completion provider.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    api_url: Option<String>,
    /// Total deadline for single-shot requests. Streams only get the
    /// connect timeout, since a long reply legitimately takes a while.
    timeout: Duration,
}

// No Debug derive: the key must never be printed.

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(
        api_key: Option<SecretString>,
        api_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            api_url,
            timeout,
        })
    }

    /// Build from config; blank values count as missing.
    pub fn from_config(config: &AnthropicConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.to_string()));
        let api_url = config
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Self::new(api_key, api_url, Duration::from_secs(config.timeout_secs))
    }

    /// Whether both credentials and an endpoint are present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.api_url.is_some()
    }

    fn endpoint(&self) -> Result<(&str, &SecretString), LlmError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY is not set".to_string()))?;
        let url = self
            .api_url
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_URL is not set".to_string()))?;
        Ok((url, key))
    }

    fn to_anthropic_request(request: &CompletionRequest, stream: bool) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            messages,
            stream,
            temperature: request.temperature,
        }
    }

    /// POST the body and map non-success statuses to typed errors.
    async fn send(
        &self,
        body: &AnthropicRequest,
        deadline: Option<Duration>,
    ) -> Result<reqwest::Response, LlmError> {
        let (url, key) = self.endpoint()?;

        let mut builder = self
            .client
            .post(url)
            .header("x-api-key", key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(body);
        if let Some(deadline) = deadline {
            builder = builder.timeout(deadline);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %error_body, "Anthropic API returned an error");
        Err(match status.as_u16() {
            401 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited,
            529 => LlmError::Overloaded(error_body),
            code => LlmError::Status {
                status: code,
                body: error_body,
            },
        })
    }
}

fn chat_span(request: &CompletionRequest, stream: bool) -> tracing::Span {
    tracing::info_span!(
        "gen_ai.chat",
        otel.name = %format!("chat {}", request.model),
        gen_ai.operation.name = "chat",
        gen_ai.provider.name = "anthropic",
        gen_ai.request.model = %request.model,
        gen_ai.request.max_tokens = request.max_tokens,
        gen_ai.request.temperature = ?request.temperature,
        gen_ai.request.stream = stream,
        gen_ai.response.id = tracing::field::Empty,
        gen_ai.usage.input_tokens = tracing::field::Empty,
        gen_ai.usage.output_tokens = tracing::field::Empty,
    )
}

impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let span = chat_span(request, false);
        let body = Self::to_anthropic_request(request, false);

        async {
            let response = self.send(&body, Some(self.timeout)).await?;
            let parsed: AnthropicNonStreamResponse = response.json().await.map_err(|e| {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            })?;

            let content = parsed
                .content
                .into_iter()
                .next()
                .map(|item| item.text)
                .ok_or_else(|| LlmError::Deserialization("response has no content".to_string()))?;

            let span = tracing::Span::current();
            span.record("gen_ai.response.id", parsed.id.as_str());
            span.record("gen_ai.usage.input_tokens", parsed.usage.input_tokens);
            span.record("gen_ai.usage.output_tokens", parsed.usage.output_tokens);

            Ok(CompletionResponse {
                id: parsed.id,
                content,
                model: parsed.model,
                stop_reason: parsed.stop_reason,
                usage: Usage {
                    input_tokens: parsed.usage.input_tokens,
                    output_tokens: parsed.usage.output_tokens,
                },
            })
        }
        .instrument(span)
        .await
    }

    async fn stream(&self, request: CompletionRequest) -> Result<EventStream, LlmError> {
        let span = chat_span(&request, true);
        let body = Self::to_anthropic_request(&request, true);

        let response = self.send(&body, None).instrument(span).await?;
        Ok(response_event_stream(response))
    }
}
