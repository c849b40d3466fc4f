//! HTTP transport to the agent gateway.
//!
//! `GatewayClient` implements `ChatTransport` from `gatechat-core` against
//! the OpenAI-compatible `/v1/chat/completions` endpoint and the `/health`
//! probe.

pub mod client;
pub mod response;
pub mod streaming;

pub use client::GatewayClient;
