//! Letterforge CLI and REST API entry point.
//!
//! Binary name: `lforge`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, SessionsAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,letterforge=debug",
        _ => "trace",
    };
    let otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    letterforge_observe::tracing_setup::init_tracing(otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "lforge", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, collaborators, controller)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, .. } => {
            let router = http::router::build_router(state);
            let addr = format!("0.0.0.0:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(addr = addr.as_str(), "letterforge API listening");
            axum::serve(listener, router).await?;
        }

        Commands::Sessions { action } => match action {
            SessionsAction::List => {
                cli::session::list_sessions(&state, cli.json).await?;
            }
            SessionsAction::Show { session_id } => {
                cli::session::show_session(&state, session_id, cli.json).await?;
            }
        },

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    letterforge_observe::tracing_setup::shutdown_tracing();
    Ok(())
}
