//! Chat with the memory assistant.
//!
//! POST /api/v1/chat answers with `{"message": reply}`. With `?stream=true`
//! the reply is relayed as Server-Sent Events instead: one `data:` event per
//! text fragment, line breaks escaped. There is no terminal event; the
//! stream simply ends. An upstream failure after the first fragment closes
//! the connection abruptly.

use std::io;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header::CONNECTION;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use luma_core::chat::relay::{FragmentSink, RelayError, SinkClosed};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::json::ApiJson;
use crate::state::AppState;

const STREAM_BUFFER: usize = 32;

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub stream: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

/// Forwards relay fragments into the SSE response body.
struct ChannelSink {
    tx: mpsc::Sender<Result<Event, io::Error>>,
}

impl FragmentSink for ChannelSink {
    async fn send(&mut self, fragment: String) -> Result<(), SinkClosed> {
        self.tx
            .send(Ok(Event::default().data(fragment)))
            .await
            .map_err(|_| SinkClosed)
    }

    async fn abort(&mut self, reason: &str) {
        // An error item makes the server drop the connection mid-body.
        let _ = self.tx.send(Err(io::Error::other(reason.to_string()))).await;
    }
}

/// POST /api/v1/chat[?stream=true]
pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChatQuery>,
    ApiJson(body): ApiJson<ChatRequest>,
) -> Result<Response, AppError> {
    let message = body.message.trim().to_string();

    if query.stream.as_deref() != Some("true") {
        let reply = state.chat_service.reply(&auth.user_id, &message).await?;
        return Ok(Json(json!({ "message": reply })).into_response());
    }

    let events = state
        .chat_service
        .open_stream(&auth.user_id, &message)
        .await?;

    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    let chat_service = state.chat_service.clone();
    let user_id = auth.user_id;
    tokio::spawn(async move {
        let mut sink = ChannelSink { tx };
        match chat_service.relay(&mut sink, user_id, &message, events).await {
            Ok(outcome) => tracing::debug!(
                user_id = %user_id,
                fragments = outcome.fragments,
                persisted = outcome.persisted,
                "chat stream complete"
            ),
            Err(RelayError::ClientGone) => {
                tracing::debug!(user_id = %user_id, "chat stream abandoned by client")
            }
            Err(RelayError::Upstream(e)) => {
                tracing::warn!(user_id = %user_id, error = %e, "chat stream aborted")
            }
        }
    });

    let sse = Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default());
    Ok(([(CONNECTION, "keep-alive")], sse).into_response())
}

/// GET /api/v1/chat/history[?limit=N]
pub async fn chat_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = match query.limit.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => return Err(AppError::Validation("Invalid limit parameter".to_string())),
        },
    };

    let messages = state.chat_service.history(&auth.user_id, limit).await?;
    Ok(Json(json!({ "messages": messages })))
}
