//! gatechat CLI entry point.
//!
//! Binary name: `gchat`
//!
//! Parses CLI arguments, sets up tracing, loads the gateway configuration,
//! then dispatches to the appropriate command handler.

mod cli;
mod feedback;
mod state;

use clap::Parser;
use clap_complete::generate;

use gatechat_types::notification::Notification;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,gatechat=debug",
        _ => "trace",
    };
    gatechat_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "gchat", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = run(&state, cli).await;
    gatechat_observe::tracing_setup::shutdown_tracing();

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => Err(e),
    }
}

/// Dispatch one command. `Ok(false)` means the command ran but reports
/// failure through the exit status (an unreachable gateway for `ping`).
async fn run(state: &AppState, cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(state, cli.quiet).await?,

        Commands::Send { text } => {
            cli::gateway::send(state, &text.join(" "), cli.json, cli.quiet).await?;
        }

        Commands::Ping => return cli::gateway::ping(state, cli.json, cli.quiet).await,

        Commands::History { limit } => {
            cli::conversation::history(state, limit, cli.json).await?;
        }

        Commands::Clear => cli::conversation::clear(state, cli.json, cli.quiet).await?,

        Commands::Notify {
            title,
            body,
            id,
            sent_at_ms,
            transport,
            stdin,
        } => {
            let notifications = if stdin {
                cli::notify::read_stdin().await?
            } else {
                vec![Notification::new(id, title, body, sent_at_ms)]
            };
            cli::notify::notify(state, &notifications, transport.into(), cli.json, cli.quiet)
                .await?;
        }

        Commands::Config => cli::config::show(state, cli.json)?,

        Commands::Completions { .. } => unreachable!("handled above"),
    }
    Ok(true)
}
