//! One-shot gateway commands: `send` and `ping`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use console::style;

use crate::feedback::TerminalFeedback;
use crate::state::AppState;

fn spinner(message: &str, quiet: bool) -> indicatif::ProgressBar {
    if quiet {
        return indicatif::ProgressBar::hidden();
    }
    let spinner = indicatif::ProgressBar::new_spinner();
    if let Ok(template) = indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Send one prompt outside the conversation and print the reply.
pub async fn send(state: &AppState, text: &str, json: bool, quiet: bool) -> Result<()> {
    let session = state
        .open_session(Arc::new(TerminalFeedback::new(!quiet)))
        .await?;

    let spinner = spinner("thinking...", quiet || json);
    let reply = session.quick_send(text).await;
    spinner.finish_and_clear();

    let Some(reply) = reply else {
        anyhow::bail!("no reply from the gateway (run with -v for details)");
    };

    if json {
        let out = serde_json::json!({ "reply": reply });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{reply}");
    }
    Ok(())
}

/// Probe the gateway. Returns whether it answered.
pub async fn ping(state: &AppState, json: bool, quiet: bool) -> Result<bool> {
    let mut session = state
        .open_session(Arc::new(TerminalFeedback::new(!quiet)))
        .await?;
    let reachable = session.check_gateway_connection().await;

    if json {
        let out = serde_json::json!({
            "base_url": state.config.base_url,
            "reachable": reachable,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if !quiet {
        if reachable {
            println!(
                "  {} Gateway reachable at {}",
                style("✓").green(),
                style(&state.config.base_url).cyan()
            );
        } else {
            println!(
                "  {} Gateway unreachable at {}",
                style("✗").red(),
                style(&state.config.base_url).cyan()
            );
        }
    }
    Ok(reachable)
}
