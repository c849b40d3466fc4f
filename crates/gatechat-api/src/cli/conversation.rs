//! Stored conversation commands: `history` and `clear`.

use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use gatechat_core::store::ConversationStore;
use gatechat_infra::feedback::LogFeedback;
use gatechat_types::message::{Message, MessageRole};

use crate::state::AppState;

/// Longest preview shown per message in the history table.
const PREVIEW_CHARS: usize = 80;

/// Print the stored conversation, oldest first.
pub async fn history(state: &AppState, limit: Option<usize>, json: bool) -> Result<()> {
    let messages = state.store().load().await?;
    let shown = tail(&messages, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!();
        println!("  No messages yet. Start with: gchat chat");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Role"),
            Cell::new("Content"),
        ]);

    for m in shown {
        let role = match m.role {
            MessageRole::User => Cell::new(m.role).fg(Color::Green),
            MessageRole::Assistant => Cell::new(m.role).fg(Color::Cyan),
            _ => Cell::new(m.role),
        };
        table.add_row(vec![
            Cell::new(m.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            role,
            Cell::new(preview(&m.content, PREVIEW_CHARS)),
        ]);
    }

    println!();
    println!(
        "  {} of {} stored messages",
        style(shown.len()).bold(),
        messages.len()
    );
    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Empty the stored conversation.
pub async fn clear(state: &AppState, json: bool, quiet: bool) -> Result<()> {
    let mut session = state.open_session(Arc::new(LogFeedback)).await?;
    let removed = session.messages().len();
    session.clear_conversation().await;

    if json {
        let out = serde_json::json!({ "cleared": removed });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if !quiet {
        println!(
            "  {} Cleared {} messages.",
            style("✓").green(),
            style(removed).bold()
        );
    }
    Ok(())
}

fn tail(messages: &[Message], limit: Option<usize>) -> &[Message] {
    match limit {
        Some(n) => &messages[messages.len().saturating_sub(n)..],
        None => messages,
    }
}

/// First line of `content`, cut to `max` characters.
pub(crate) fn preview(content: &str, max: usize) -> String {
    let line = content.lines().next().unwrap_or_default();
    let more = line.chars().count() > max || content.lines().nth(1).is_some();
    let mut out: String = line.chars().take(max).collect();
    if more {
        out.push('…');
    }
    out
}
