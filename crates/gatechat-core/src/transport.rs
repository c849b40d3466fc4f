//! ChatTransport trait definition.
//!
//! This is the seam between the conversation session and the network.
//! Uses RPITIT for the one-shot calls and `Pin<Box<dyn Stream>>` for
//! streaming, because the stream must outlive the borrow of the transport.

use std::pin::Pin;

use futures_util::Stream;
use tokio_util::sync::CancellationToken;

use gatechat_types::error::SessionError;
use gatechat_types::protocol::WireMessage;

/// Lazy, finite sequence of text deltas from one streaming response.
///
/// Ends normally on `[DONE]`, on a `"stop"` finish reason, at end of body,
/// or when the cancellation token fires. HTTP status failures surface as
/// the first item, before any delta.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, SessionError>> + Send + 'static>>;

/// Network access to the agent gateway.
///
/// Each call performs exactly one exchange and never retries; retrying is
/// the conversation session's job. Implementations live in gatechat-infra
/// (e.g., `GatewayClient`).
pub trait ChatTransport: Send + Sync {
    /// Open a streaming chat completion.
    ///
    /// `messages` must be non-empty. Cancelling `cancel` ends the stream
    /// without an error and releases the connection.
    fn stream_chat(&self, messages: Vec<WireMessage>, cancel: CancellationToken) -> DeltaStream;

    /// Send a buffered chat completion and return the first choice's text
    /// (empty when the gateway sent none).
    fn send_chat(
        &self,
        messages: Vec<WireMessage>,
    ) -> impl std::future::Future<Output = Result<String, SessionError>> + Send;

    /// Probe the gateway's health endpoint. Never fails; any problem is
    /// reported as `false`.
    fn ping_gateway(&self) -> impl std::future::Future<Output = bool> + Send;
}
