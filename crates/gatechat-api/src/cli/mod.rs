//! CLI command definitions for the `gchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod config;
pub mod conversation;
pub mod gateway;
pub mod notify;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use gatechat_types::notification::DeliveryTransport;

/// Chat with an agent gateway from the terminal.
#[derive(Parser)]
#[command(name = "gchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive, streaming chat.
    Chat,

    /// Send one prompt without touching the conversation and print the reply.
    Send {
        /// Prompt text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Check whether the gateway is reachable (exit status 1 when it is not).
    Ping,

    /// Show the stored conversation.
    History {
        /// Show only the most recent N messages.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Delete the stored conversation.
    Clear,

    /// Deliver a notification into the conversation.
    Notify {
        /// Notification title.
        #[arg(long, default_value = "")]
        title: String,

        /// Notification body.
        #[arg(long, default_value = "")]
        body: String,

        /// Explicit delivery id used for deduplication.
        #[arg(long)]
        id: Option<String>,

        /// Send time in milliseconds since the epoch.
        #[arg(long)]
        sent_at_ms: Option<i64>,

        /// Delivery mechanism the notification arrived through.
        #[arg(long, value_enum, default_value_t = TransportArg::Live)]
        transport: TransportArg,

        /// Read JSON notifications from stdin, one per line, instead.
        #[arg(long, conflicts_with_all = ["title", "body", "id", "sent_at_ms"])]
        stdin: bool,
    },

    /// Print the effective configuration (token redacted).
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Live,
    Queued,
    Latest,
}

impl From<TransportArg> for DeliveryTransport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Live => DeliveryTransport::Live,
            TransportArg::Queued => DeliveryTransport::Queued,
            TransportArg::Latest => DeliveryTransport::LatestValue,
        }
    }
}
