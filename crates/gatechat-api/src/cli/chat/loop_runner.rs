//! Main chat loop orchestrating input, streaming and slash commands.
//!
//! `run_chat_loop` drives one interactive session: it restores the stored
//! conversation, then alternates between reading input and running turns.
//! While a turn streams, input keeps being read so Ctrl+C can cancel it.

use std::io::Write;
use std::sync::Arc;

use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use gatechat_types::message::MessageRole;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::TurnRenderer;
use crate::cli::conversation::preview;
use crate::feedback::TerminalFeedback;
use crate::state::{AppState, ConcreteSession};

/// Messages shown by `/history`.
const HISTORY_SHOWN: usize = 20;

enum Turn {
    Send(String),
    Retry,
}

/// Run the interactive chat loop until `/exit` or Ctrl+D.
pub async fn run_chat_loop(state: &AppState, quiet: bool) -> anyhow::Result<()> {
    let mut session = state
        .open_session(Arc::new(TerminalFeedback::new(!quiet)))
        .await?;
    let reachable = session.check_gateway_connection().await;

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, mut out) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    print_welcome_banner(
        &mut out,
        &state.config.base_url,
        &state.config.model,
        session.messages().len(),
        reachable,
    );

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                let _ = writeln!(out, "\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                let _ = writeln!(out, "\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                let Some(cmd) = commands::parse(&text) else {
                    if run_turn(&mut session, &mut chat_input, &out, Turn::Send(text), quiet).await {
                        break;
                    }
                    continue;
                };

                match cmd {
                    ChatCommand::Help => commands::print_help(&mut out),
                    ChatCommand::Retry => {
                        let has_user_message = session
                            .messages()
                            .iter()
                            .any(|m| m.role == MessageRole::User);
                        if !has_user_message {
                            let _ = writeln!(out, "\n  {}\n", style("Nothing to retry.").dim());
                        } else if run_turn(&mut session, &mut chat_input, &out, Turn::Retry, quiet).await {
                            break;
                        }
                    }
                    ChatCommand::Clear => {
                        session.clear_conversation().await;
                        chat_input.clear();
                        let _ = writeln!(out, "  {}\n", style("Conversation cleared.").dim());
                    }
                    ChatCommand::Ping => {
                        let (mark, status) = if session.check_gateway_connection().await {
                            (style("✓").green(), "reachable")
                        } else {
                            (style("✗").red(), "unreachable")
                        };
                        let _ = writeln!(
                            out,
                            "\n  {mark} Gateway {status} at {}\n",
                            style(&state.config.base_url).cyan()
                        );
                    }
                    ChatCommand::History => print_history(&session, &mut out),
                    ChatCommand::Exit => {
                        let _ = writeln!(out, "\n  {}", style("Session ended.").dim());
                        break;
                    }
                    ChatCommand::Unknown(name) => {
                        let _ = writeln!(
                            out,
                            "\n  {} Unknown command: {}. Type /help for available commands.\n",
                            style("?").yellow().bold(),
                            style(name).dim()
                        );
                    }
                }
            }
        }
    }

    chat_input.flush();
    Ok(())
}

/// Run one turn, rendering its events. Returns true when the user asked
/// to leave (Ctrl+D) while the turn was streaming.
async fn run_turn(
    session: &mut ConcreteSession,
    chat_input: &mut ChatInput,
    out: &SharedWriter,
    turn: Turn,
    quiet: bool,
) -> bool {
    let mut events = session.subscribe();
    let cancel = CancellationToken::new();
    let mut renderer = TurnRenderer::start(out.clone(), "Agent", quiet);
    let mut exit_requested = false;

    {
        let turn_cancel = cancel.clone();
        let fut = async {
            match turn {
                Turn::Send(text) => session.send_message_with_cancel(&text, turn_cancel).await,
                Turn::Retry => session.retry_last_message_with_cancel(turn_cancel).await,
            }
        };
        tokio::pin!(fut);

        loop {
            tokio::select! {
                _ = &mut fut => break,
                event = events.recv() => match event {
                    Ok(event) => renderer.handle(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "chat renderer lagged behind session events");
                    }
                    Err(RecvError::Closed) => {}
                },
                input = chat_input.read_line(), if !cancel.is_cancelled() => match input {
                    InputEvent::Interrupted => {
                        tracing::debug!("turn cancelled from the keyboard");
                        cancel.cancel();
                    }
                    InputEvent::Eof => {
                        exit_requested = true;
                        cancel.cancel();
                    }
                    // Lines typed while a reply streams are dropped.
                    InputEvent::Message(_) => {}
                },
            }
        }
    }

    while let Ok(event) = events.try_recv() {
        renderer.handle(&event);
    }
    if renderer.failed() {
        tracing::debug!("turn ended with a failure");
    }
    renderer.finish();

    if exit_requested {
        let mut out = out.clone();
        let _ = writeln!(out, "  {}", style("Session ended.").dim());
    }
    exit_requested
}

fn print_history(session: &ConcreteSession, out: &mut impl Write) {
    let messages = session.messages();
    let shown = &messages[messages.len().saturating_sub(HISTORY_SHOWN)..];

    let _ = writeln!(out);
    if shown.is_empty() {
        let _ = writeln!(out, "  {}", style("No messages yet.").dim());
    }
    for msg in shown {
        let label = match msg.role {
            MessageRole::User => style("You").green(),
            MessageRole::Assistant => style("Agent").cyan(),
            _ => style("System").dim(),
        };
        let _ = writeln!(out, "  {} {}", label.bold(), preview(&msg.content, 100));
    }
    let _ = writeln!(out);
}
