//! Terminal feedback: rings the bell when a turn fails.

use console::Term;

use gatechat_core::feedback::{Feedback, FeedbackSignaler};
use gatechat_infra::feedback::LogFeedback;

pub struct TerminalFeedback {
    term: Term,
    enabled: bool,
}

impl TerminalFeedback {
    /// Feedback on stderr. `enabled = false` (e.g. `--quiet`) keeps it silent.
    pub fn new(enabled: bool) -> Self {
        let term = Term::stderr();
        let enabled = enabled && term.is_term();
        Self { term, enabled }
    }
}

impl FeedbackSignaler for TerminalFeedback {
    fn signal(&self, feedback: Feedback) {
        LogFeedback.signal(feedback);
        if self.enabled && feedback == Feedback::Error {
            let _ = self.term.write_str("\x07");
        }
    }
}
