//! CLI command definitions and dispatch for the `lforge` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! verb-noun pattern (e.g., `lforge serve`, `lforge sessions list`).

pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

/// Generate offer letters with human-in-the-loop review.
#[derive(Parser)]
#[command(name = "lforge", version, about, long_about = None)]
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

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 8080, env = "LETTERFORGE_PORT")]
        port: u16,

        /// Export traces via OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Inspect letter-generation sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List all sessions, newest first.
    #[command(alias = "ls")]
    List,

    /// Show a session's latest checkpoint and history.
    Show {
        /// Session id to display.
        session_id: Uuid,
    },
}
