//! Shared domain types for gatechat.
//!
//! This crate contains the wire contract for the OpenAI-compatible chat
//! completion API, the conversation message model, inbound notifications,
//! session events, configuration and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod notification;
pub mod protocol;
