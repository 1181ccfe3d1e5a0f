//! Line-oriented stream parser for the Anthropic Messages API.
//!
//! The streamed body is read as newline-delimited records. Each line is
//! handled on its own:
//! 1. blank lines are ignored
//! 2. `data: [DONE]` ends the stream
//! 3. `data: {json}` is parsed as a record; malformed JSON is logged and skipped
//! 4. any other line is still tried as a bare JSON record (SSE `event:`
//!    framing lines simply fail that parse and are ignored)
//!
//! Only `content_block_delta` records with a `text_delta`/`text` delta
//! produce events. A line that is not valid UTF-8 is logged and skipped
//! like malformed JSON. A body read error ends the stream with one error item.

use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tokio_util::io::StreamReader;

use luma_core::llm::provider::EventStream;
use luma_types::llm::{LlmError, StreamEvent};

use super::types::StreamRecord;

/// Longest line accepted from the upstream.
const MAX_LINE_BYTES: usize = 1024 * 1024;

/// What one upstream line means for the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A text fragment to forward.
    Text(String),
    /// The terminal sentinel.
    Done,
    /// Nothing to forward.
    Ignore,
    /// A `data:` line whose payload is not a valid record.
    Malformed(String),
}

/// Classify one line of the streamed body.
pub fn parse_line(line: &str) -> LineOutcome {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return LineOutcome::Ignore;
    }

    match line.strip_prefix("data: ") {
        Some(data) => {
            if data.trim() == "[DONE]" {
                return LineOutcome::Done;
            }
            match serde_json::from_str::<StreamRecord>(data) {
                Ok(record) => record.text_delta().map_or(LineOutcome::Ignore, LineOutcome::Text),
                Err(e) => LineOutcome::Malformed(e.to_string()),
            }
        }
        None => match serde_json::from_str::<StreamRecord>(line) {
            Ok(record) => record.text_delta().map_or(LineOutcome::Ignore, LineOutcome::Text),
            Err(_) => LineOutcome::Ignore,
        },
    }
}

/// Classify one raw line, treating undecodable bytes as a malformed line.
pub fn parse_bytes(line: &[u8]) -> LineOutcome {
    match std::str::from_utf8(line) {
        Ok(line) => parse_line(line),
        Err(e) => LineOutcome::Malformed(e.to_string()),
    }
}

/// Turn any byte source into a stream of [`StreamEvent`]s.
pub fn line_event_stream<R>(reader: R) -> EventStream
where
    R: AsyncRead + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut lines = Box::pin(FramedRead::new(
            reader,
            AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), MAX_LINE_BYTES),
        ));

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "upstream stream read failed");
                    yield Err(LlmError::Stream(e.to_string()));
                    break;
                }
            };

            match parse_bytes(&line) {
                LineOutcome::Text(text) => yield Ok(StreamEvent::TextDelta { text }),
                LineOutcome::Done => {
                    yield Ok(StreamEvent::Done);
                    break;
                }
                LineOutcome::Ignore => {}
                LineOutcome::Malformed(error) => {
                    tracing::warn!(
                        error = %error,
                        line = %String::from_utf8_lossy(&line),
                        "skipping malformed stream line"
                    );
                }
            }
        }
    })
}

/// Stream the body of an accepted streaming response.
pub fn response_event_stream(response: reqwest::Response) -> EventStream {
    let body = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(std::io::Error::other));
    line_event_stream(StreamReader::new(body))
}
