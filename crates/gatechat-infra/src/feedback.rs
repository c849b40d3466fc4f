//! Feedback signaler that records turn transitions in the log.

use gatechat_core::feedback::{Feedback, FeedbackSignaler};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackSignaler for LogFeedback {
    fn signal(&self, feedback: Feedback) {
        match feedback {
            Feedback::Error => tracing::warn!(%feedback, "feedback"),
            _ => tracing::debug!(%feedback, "feedback"),
        }
    }
}
