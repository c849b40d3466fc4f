//! Conversation state and the turn engine that drives it.

pub mod log;
pub mod session;

pub use log::ConversationLog;
pub use session::{ConversationSession, SessionState, TurnPhase};
