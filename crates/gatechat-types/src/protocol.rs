//! Wire types for the OpenAI-compatible chat completion API.
//!
//! Field names match the gateway's JSON exactly. Inbound types ignore any
//! field they do not name (`id`, `usage`, `role`, vendor extensions), so a
//! gateway adding fields never breaks decoding.

use serde::{Deserialize, Serialize};

/// Prefix of the only SSE field the client consumes.
pub const SSE_DATA_PREFIX: &str = "data: ";

/// Literal payload that ends a streaming response.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Finish reason that ends a streaming response.
pub const FINISH_REASON_STOP: &str = "stop";

/// One `{role, content}` pair in an outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
}

/// Non-streaming response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the gateway sent one.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

/// One JSON payload of a streaming response (`data: {...}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Text fragment carried by the first choice.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }

    /// Finish reason carried by the first choice.
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
    }
}

/// Why a stream stopped producing deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishSignal {
    /// The `[DONE]` sentinel arrived.
    Done,
    /// A chunk carried `finish_reason: "stop"`.
    Stop,
}

/// Parsed unit of a streaming response.
///
/// `delta` may be an empty string: an empty fragment still counts as an
/// arrival. `finish` is set on the last chunk the parser will ever emit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamChunk {
    pub delta: Option<String>,
    pub finish: Option<FinishSignal>,
}

impl StreamChunk {
    pub fn delta(text: impl Into<String>) -> Self {
        Self {
            delta: Some(text.into()),
            finish: None,
        }
    }

    pub fn finished(signal: FinishSignal) -> Self {
        Self {
            delta: None,
            finish: Some(signal),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.finish.is_some()
    }
}
