//! Fire-and-forget user feedback at turn transitions.
//!
//! The session calls [`FeedbackSignaler::signal`] synchronously and never
//! waits on or inspects the outcome.

use std::fmt;

/// Moments the session reports to the feedback collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// A user message was appended.
    MessageSent,
    /// An assistant reply finished streaming.
    ResponseComplete,
    /// A turn failed.
    Error,
    /// A health check succeeded.
    Connected,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::MessageSent => write!(f, "message_sent"),
            Feedback::ResponseComplete => write!(f, "response_complete"),
            Feedback::Error => write!(f, "error"),
            Feedback::Connected => write!(f, "connected"),
        }
    }
}

/// Receiver of [`Feedback`] signals (haptics, sounds, terminal bell).
pub trait FeedbackSignaler: Send + Sync {
    fn signal(&self, feedback: Feedback);
}

/// Signaler that drops every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFeedback;

impl FeedbackSignaler for NoopFeedback {
    fn signal(&self, _feedback: Feedback) {}
}
