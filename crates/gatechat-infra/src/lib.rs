//! Infrastructure layer for gatechat.
//!
//! Contains implementations of the traits defined in `gatechat-core`: the
//! reqwest-based gateway transport, the JSON-file conversation store and a
//! logging feedback signaler, plus config loading and data-dir layout.

pub mod config;
pub mod feedback;
pub mod filesystem;
pub mod gateway;
pub mod store;
