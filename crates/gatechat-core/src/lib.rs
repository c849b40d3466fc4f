//! Streaming chat session engine for gatechat.
//!
//! This crate defines the "ports" the infrastructure layer implements
//! (`ChatTransport`, `ConversationStore`, `FeedbackSignaler`) and the logic
//! that drives them: the SSE frame parser and the conversation session. It
//! depends only on `gatechat-types` -- never on `gatechat-infra` or any
//! HTTP/IO crate.

pub mod chat;
pub mod event;
pub mod feedback;
pub mod parser;
pub mod store;
pub mod transport;
