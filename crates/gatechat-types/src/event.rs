//! Events broadcast by the conversation session.
//!
//! `SessionEvent` is how presentation layers observe the conversation.
//! All variants are Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::MessageRole;
use crate::notification::DeliveryTransport;

/// State changes of the conversation, in the order they happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A message was appended to the log.
    MessageAppended {
        message_id: Uuid,
        role: MessageRole,
        pending: bool,
    },

    /// A text delta was appended to the pending assistant message.
    DeltaReceived { message_id: Uuid, text: String },

    /// The turn finished normally (or was cancelled) and the reply settled.
    TurnCompleted { message_id: Uuid, content: String },

    /// The turn failed; the reply now holds the warning text.
    TurnFailed { message_id: Uuid, error: String },

    /// The "waiting for the first delta" flag changed.
    ThinkingChanged { thinking: bool },

    /// Gateway reachability changed.
    ReachabilityChanged { reachable: bool },

    /// The log was emptied.
    ConversationCleared,

    /// An out-of-band notification was appended.
    NotificationConsumed {
        message_id: Uuid,
        transport: DeliveryTransport,
    },
}
