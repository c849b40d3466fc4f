//! Interactive CLI chat for gatechat.
//!
//! This module implements the chat loop: streamed replies printed as they
//! arrive, a thinking spinner, a welcome banner and slash commands. Entry
//! point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
