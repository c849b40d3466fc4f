//! Welcome banner display for chat sessions.

use std::io::Write;

use console::style;

/// Print the welcome banner: gateway, model, connection state and the
/// size of the restored conversation.
pub fn print_welcome_banner(
    out: &mut impl Write,
    base_url: &str,
    model: &str,
    restored: usize,
    reachable: bool,
) {
    let status = if reachable {
        style("connected").green()
    } else {
        style("unreachable").red()
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", style("gatechat").cyan().bold());
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  {} ({status})", style("Gateway:").bold(), style(base_url).dim());
    let _ = writeln!(out, "  {}    {}", style("Model:").bold(), style(model).dim());
    if restored > 0 {
        let _ = writeln!(
            out,
            "  {} {}",
            style("Restored:").bold(),
            style(format!("{restored} messages")).dim()
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    let _ = writeln!(out, "  {}", style("---").dim());
    let _ = writeln!(out);
}
