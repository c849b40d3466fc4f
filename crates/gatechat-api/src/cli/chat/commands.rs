//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for the
//! conversation and the gateway connection.

use std::io::Write;

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Resend the last user message.
    Retry,
    /// Empty the conversation and the screen.
    Clear,
    /// Probe the gateway.
    Ping,
    /// Show recent messages.
    History,
    /// Exit the chat session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/retry" | "/r" => Some(ChatCommand::Retry),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/ping" => Some(ChatCommand::Ping),
        "/history" => Some(ChatCommand::History),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help(out: &mut impl Write) {
    let rows = [
        ("/help", "Show this help message"),
        ("/retry", "Resend your last message"),
        ("/clear", "Clear the conversation"),
        ("/ping", "Check the gateway connection"),
        ("/history", "Show recent messages"),
        ("/exit", "End the chat session"),
    ];

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", style("Available commands:").bold());
    let _ = writeln!(out);
    for (name, about) in rows {
        let _ = writeln!(out, "  {:<10}{}", style(name).cyan(), about);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {}",
        style("Ctrl+C cancels a streaming reply, Ctrl+D exits").dim()
    );
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse("/retry"), Some(ChatCommand::Retry));
        assert_eq!(parse("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse("/ping"), Some(ChatCommand::Ping));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_ignores_args() {
        assert_eq!(parse("  /RETRY now "), Some(ChatCommand::Retry));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/remember x"),
            Some(ChatCommand::Unknown("/remember".to_string()))
        );
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("hello /help"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut out = Vec::new();
        print_help(&mut out);
        let text = String::from_utf8(out).unwrap();
        for name in ["/help", "/retry", "/clear", "/ping", "/history", "/exit"] {
            assert!(text.contains(name), "missing {name}");
        }
    }
}
