//! Conversation message types.
//!
//! A [`Message`] is one turn in the conversation log. Its `id` and
//! `created_at` are fixed at construction; only `content` and `pending`
//! change afterwards, and only through the conversation log in core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::protocol::WireMessage;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
    Tool,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            "tool" => Ok(MessageRole::Tool),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// True while an assistant reply is still streaming into `content`.
    #[serde(default)]
    pub pending: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a settled message with a fresh id and timestamp.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            pending: false,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Empty assistant message that deltas will be appended to.
    pub fn pending_assistant() -> Self {
        Self {
            pending: true,
            ..Self::new(MessageRole::Assistant, String::new())
        }
    }

    /// Whether the message carries no sendable text.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Project onto the outbound `{role, content}` wire pair.
    pub fn to_wire(&self) -> WireMessage {
        WireMessage::new(self.role.to_string(), self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::System,
            MessageRole::Tool,
        ] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str("\"tool\"").unwrap();
        assert_eq!(parsed, MessageRole::Tool);
    }

    #[test]
    fn test_invalid_role() {
        assert!("moderator".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_user_message_is_never_pending() {
        let msg = Message::user("hi");
        assert_eq!(msg.role, MessageRole::User);
        assert!(!msg.pending);
    }

    #[test]
    fn test_pending_assistant() {
        let msg = Message::pending_assistant();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.pending);
        assert!(msg.content.is_empty());
        assert!(msg.is_blank());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_to_wire() {
        let wire = Message::assistant("Hi there").to_wire();
        assert_eq!(wire.role, "assistant");
        assert_eq!(wire.content, "Hi there");
    }

    #[test]
    fn test_missing_pending_defaults_to_false() {
        let json = format!(
            r#"{{"id":"{}","role":"user","content":"x","created_at":"2026-01-01T00:00:00Z"}}"#,
            Uuid::now_v7()
        );
        let msg: Message = serde_json::from_str(&json).unwrap();
        assert!(!msg.pending);
    }
}
