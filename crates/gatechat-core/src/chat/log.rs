//! The ordered conversation log.
//!
//! `ConversationLog` is append-only from the outside, with three sanctioned
//! exceptions: in-place growth of the single pending reply, bulk clear, and
//! removal of the latest user/assistant exchange for a retry. Every method
//! keeps the pending invariant: at most one message is pending, and it is
//! the last one, with the assistant role.

use gatechat_types::message::{Message, MessageRole};
use gatechat_types::protocol::WireMessage;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from stored messages.
    ///
    /// A stored pending flag can only come from an interrupted process, so
    /// it is cleared.
    pub fn from_messages(mut messages: Vec<Message>) -> Self {
        for message in &mut messages {
            message.pending = false;
        }
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a settled message. Any reply still pending is settled first.
    pub fn push(&mut self, mut message: Message) -> Uuid {
        self.finish_pending();
        message.pending = false;
        let id = message.id;
        self.messages.push(message);
        id
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> Uuid {
        self.push(Message::user(text))
    }

    /// Append an empty pending assistant message and return its id.
    pub fn begin_assistant(&mut self) -> Uuid {
        self.finish_pending();
        let message = Message::pending_assistant();
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// The message currently receiving deltas.
    pub fn pending(&self) -> Option<&Message> {
        self.messages.last().filter(|m| m.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending).count()
    }

    /// Append `text` to the pending reply. Returns `None` when nothing is pending.
    pub fn append_delta(&mut self, text: &str) -> Option<Uuid> {
        let message = self.messages.last_mut().filter(|m| m.pending)?;
        message.content.push_str(text);
        Some(message.id)
    }

    /// Settle the pending reply, keeping its content.
    pub fn finish_pending(&mut self) -> Option<&Message> {
        let message = self.messages.last_mut().filter(|m| m.pending)?;
        message.pending = false;
        Some(message)
    }

    /// Replace the pending reply's content with `text` and settle it.
    pub fn fail_pending(&mut self, text: impl Into<String>) -> Option<Uuid> {
        let message = self.messages.last_mut().filter(|m| m.pending)?;
        message.content = text.into();
        message.pending = false;
        Some(message.id)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Remove the most recent user message and the assistant reply directly
    /// after it (if there is one), returning the user's text.
    ///
    /// Messages after that exchange are left in place.
    pub fn take_last_exchange(&mut self) -> Option<String> {
        let user_index = self
            .messages
            .iter()
            .rposition(|m| m.role == MessageRole::User)?;

        let reply_follows = self
            .messages
            .get(user_index + 1)
            .is_some_and(|m| m.role == MessageRole::Assistant);
        if reply_follows {
            self.messages.remove(user_index + 1);
        }

        Some(self.messages.remove(user_index).content)
    }

    /// Outbound history: the last `window` messages of the log, then minus
    /// those with blank content, in original order.
    pub fn history_window(&self, window: usize) -> Vec<WireMessage> {
        let start = self.messages.len().saturating_sub(window);
        self.messages[start..]
            .iter()
            .filter(|m| !m.is_blank())
            .map(Message::to_wire)
            .collect()
    }
}
