//! SSE `data:` line parser for chat completion chunks.
//!
//! Only lines starting with `data: ` matter; blank separators, comments
//! (`: keepalive`) and other SSE fields (`event:`, `id:`, `retry:`) are
//! dropped. A payload that fails to decode is skipped: gateways interleave
//! heartbeat and vendor frames, and one bad frame must not end the stream.

use gatechat_types::protocol::{
    ChatCompletionChunk, DONE_SENTINEL, FINISH_REASON_STOP, FinishSignal, SSE_DATA_PREFIX,
    StreamChunk,
};

/// Line-at-a-time parser for one streaming response.
///
/// The only state carried between lines is whether a terminal signal has
/// been seen; once it has, every further line is ignored.
#[derive(Debug, Default)]
pub struct FrameParser {
    terminated: bool,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `[DONE]` or a `"stop"` finish reason has been consumed.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Parse one line of the response body.
    ///
    /// Returns `None` for lines that carry nothing: non-data lines, frames
    /// that fail to decode, chunks with neither text nor a stop, and
    /// everything after termination.
    pub fn parse_line(&mut self, line: &str) -> Option<StreamChunk> {
        if self.terminated {
            return None;
        }

        let line = line.strip_suffix('\r').unwrap_or(line);
        let payload = line.strip_prefix(SSE_DATA_PREFIX)?;

        if payload.trim() == DONE_SENTINEL {
            self.terminated = true;
            return Some(StreamChunk::finished(FinishSignal::Done));
        }

        let chunk: ChatCompletionChunk = match serde_json::from_str(payload) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::trace!(error = %e, "skipping undecodable SSE frame");
                return None;
            }
        };

        let delta = chunk.delta_content().map(str::to_string);
        let finish = match chunk.finish_reason() {
            Some(FINISH_REASON_STOP) => {
                self.terminated = true;
                Some(FinishSignal::Stop)
            }
            Some(other) => {
                tracing::debug!(finish_reason = other, "non-stop finish reason, continuing");
                None
            }
            None => None,
        };

        if delta.is_none() && finish.is_none() {
            return None;
        }

        Some(StreamChunk { delta, finish })
    }
}

/// Parse a sequence of complete lines, stopping at the terminal signal.
pub fn parse_lines<'a, I>(lines: I) -> Vec<StreamChunk>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = FrameParser::new();
    let mut chunks = Vec::new();
    for line in lines {
        if let Some(chunk) = parser.parse_line(line) {
            chunks.push(chunk);
        }
        if parser.is_terminated() {
            break;
        }
    }
    chunks
}
