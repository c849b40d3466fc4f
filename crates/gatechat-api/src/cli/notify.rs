//! `notify` command: deliver out-of-band notifications into the conversation.
//!
//! One notification comes from flags; with `--stdin`, any number come as
//! JSON lines (`{"id":..,"title":..,"body":..,"sentAtMs":..}`) and are
//! delivered through the same session, so repeats are dropped.

use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use tokio::io::AsyncReadExt;

use gatechat_types::notification::{DeliveryTransport, Notification};

use crate::feedback::TerminalFeedback;
use crate::state::AppState;

/// Read newline-delimited JSON notifications from stdin.
pub async fn read_stdin() -> Result<Vec<Notification>> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read stdin")?;
    parse_lines(&input)
}

fn parse_lines(input: &str) -> Result<Vec<Notification>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid notification on line {}", i + 1))
        })
        .collect()
}

pub async fn notify(
    state: &AppState,
    notifications: &[Notification],
    transport: DeliveryTransport,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let mut session = state
        .open_session(Arc::new(TerminalFeedback::new(!quiet)))
        .await?;

    let mut appended = 0usize;
    for notification in notifications {
        if session.consume_notification(notification, transport).await {
            appended += 1;
        }
    }
    let skipped = notifications.len() - appended;

    if json {
        let out = serde_json::json!({
            "transport": transport.to_string(),
            "appended": appended,
            "duplicates": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if !quiet {
        println!(
            "  {} Delivered {} notification(s) via {}",
            style("✓").green(),
            style(appended).bold(),
            style(transport).cyan()
        );
        if skipped > 0 {
            println!("  {}", style(format!("{skipped} duplicate(s) dropped")).dim());
        }
    }
    Ok(())
}
