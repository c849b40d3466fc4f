//! Streaming turn renderer.
//!
//! `TurnRenderer` turns the session's event stream into terminal output:
//! a "thinking..." spinner until the first delta, deltas printed as they
//! arrive, a warning line when the turn fails, and a timing footer.

use std::io::Write;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use gatechat_types::event::SessionEvent;

pub struct TurnRenderer<W: Write> {
    out: W,
    label: String,
    spinner: ProgressBar,
    started: Instant,
    streamed_chars: usize,
    failed: bool,
}

impl<W: Write> TurnRenderer<W> {
    /// Start rendering a turn. A hidden spinner is used when `quiet`.
    pub fn start(out: W, label: impl Into<String>, quiet: bool) -> Self {
        let spinner = if quiet {
            ProgressBar::hidden()
        } else {
            let spinner = ProgressBar::new_spinner();
            if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                spinner.set_style(template);
            }
            spinner.set_message("thinking...");
            spinner.enable_steady_tick(Duration::from_millis(80));
            spinner
        };
        Self {
            out,
            label: label.into(),
            spinner,
            started: Instant::now(),
            streamed_chars: 0,
            failed: false,
        }
    }

    pub fn handle(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ThinkingChanged { thinking: false } => {
                self.spinner.finish_and_clear();
            }
            SessionEvent::DeltaReceived { text, .. } => {
                self.spinner.finish_and_clear();
                if self.streamed_chars == 0 {
                    let _ = write!(self.out, "\n  {} ", style(&self.label).cyan().bold());
                }
                self.streamed_chars += text.chars().count();
                let _ = write!(self.out, "{text}");
                let _ = self.out.flush();
            }
            SessionEvent::TurnFailed { error, .. } => {
                self.spinner.finish_and_clear();
                self.failed = true;
                let _ = writeln!(self.out, "\n  {} {error}", style("!").red().bold());
                let _ = writeln!(
                    self.out,
                    "  {}",
                    style("Type /retry to try again, /exit to quit.").dim()
                );
            }
            _ => {}
        }
    }

    /// Whether the turn ended with a failure.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Close the turn: clears the spinner and prints the footer.
    pub fn finish(mut self) -> W {
        self.spinner.finish_and_clear();
        if self.streamed_chars > 0 && !self.failed {
            let _ = writeln!(self.out);
            let footer = format_footer(self.streamed_chars, self.started.elapsed());
            let _ = writeln!(self.out, "  {}", style(footer).dim());
        }
        let _ = writeln!(self.out);
        self.out
    }
}

fn format_footer(chars: usize, elapsed: Duration) -> String {
    format!("[{chars} chars | {:.1}s]", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn render(events: &[SessionEvent]) -> (String, bool) {
        let mut renderer = TurnRenderer::start(Vec::new(), "Agent", true);
        for event in events {
            renderer.handle(event);
        }
        let failed = renderer.failed();
        let out = renderer.finish();
        (console::strip_ansi_codes(&String::from_utf8(out).unwrap()).into_owned(), failed)
    }

    #[test]
    fn test_deltas_print_in_order_with_label_once() {
        let id = Uuid::now_v7();
        let (out, failed) = render(&[
            SessionEvent::ThinkingChanged { thinking: true },
            SessionEvent::DeltaReceived { message_id: id, text: "Hel".into() },
            SessionEvent::ThinkingChanged { thinking: false },
            SessionEvent::DeltaReceived { message_id: id, text: "lo".into() },
            SessionEvent::TurnCompleted { message_id: id, content: "Hello".into() },
        ]);
        assert!(!failed);
        assert!(out.contains("Agent Hello"));
        assert_eq!(out.matches("Agent").count(), 1);
        assert!(out.contains("[5 chars |"));
    }

    #[test]
    fn test_failure_prints_warning_without_footer() {
        let id = Uuid::now_v7();
        let (out, failed) = render(&[SessionEvent::TurnFailed {
            message_id: id,
            error: "gateway unreachable".into(),
        }]);
        assert!(failed);
        assert!(out.contains("! gateway unreachable"));
        assert!(out.contains("/retry"));
        assert!(!out.contains("chars |"));
    }

    #[test]
    fn test_empty_turn_prints_nothing_but_spacing() {
        let (out, _) = render(&[]);
        assert_eq!(out.trim(), "");
    }

    #[test]
    fn test_format_footer() {
        assert_eq!(format_footer(12, Duration::from_millis(1500)), "[12 chars | 1.5s]");
    }
}
