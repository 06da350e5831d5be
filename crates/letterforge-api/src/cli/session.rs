//! Session inspection CLI commands: list, show.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use uuid::Uuid;

use letterforge_types::checkpoint::RunStatus;

use crate::state::AppState;

fn status_cell(status: RunStatus) -> Cell {
    match status {
        RunStatus::Running => Cell::new("● running").fg(Color::Cyan),
        RunStatus::AwaitingInput => Cell::new("◐ awaiting input").fg(Color::Yellow),
        RunStatus::Completed => Cell::new("✓ completed").fg(Color::Green),
    }
}

/// List all sessions with their latest status.
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let session_ids = state.controller.sessions().await?;

    let mut rows = Vec::with_capacity(session_ids.len());
    for session_id in session_ids {
        let latest = state.controller.latest(session_id).await?;
        rows.push(latest);
    }

    if json {
        let summaries: Vec<serde_json::Value> = rows
            .iter()
            .map(|cp| {
                serde_json::json!({
                    "session_id": cp.session_id,
                    "status": cp.status,
                    "resume_step": cp.resume_step,
                    "updated_at": cp.created_at,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("POST /api/v1/letters").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Session").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Next Step").fg(Color::White),
        Cell::new("Agency").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    let count = rows.len();
    for cp in &rows {
        let next_step = cp
            .resume_step
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(cp.session_id.to_string()).fg(Color::Cyan),
            status_cell(cp.status),
            Cell::new(next_step),
            Cell::new(&cp.state.agency_name),
            Cell::new(cp.created_at.format("%Y-%m-%d %H:%M:%S").to_string())
                .fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(count).bold(),
        if count == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show a session's latest checkpoint and full history.
pub async fn show_session(state: &AppState, session_id: Uuid, json: bool) -> Result<()> {
    let latest = state.controller.latest(session_id).await?;
    let history = state.controller.history(session_id).await?;

    if json {
        let body = serde_json::json!({
            "session_id": session_id,
            "latest": latest,
            "checkpoints": history.len(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session {}",
        style("▸").bold(),
        style(session_id.to_string()).cyan()
    );
    println!();
    println!("  {}  {:?}", style("Status:").bold(), latest.status);
    if let Some(step) = latest.resume_step {
        println!("  {}  {}", style("Next step:").bold(), step);
    }
    println!(
        "  {}  {}",
        style("Agency:").bold(),
        latest.state.agency_name
    );
    if let Some(locator) = &latest.state.pdf_locator {
        println!("  {}  {}", style("PDF:").bold(), style(locator).yellow());
    }
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Checkpoint").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Next Step").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for cp in &history {
        let next_step = cp
            .resume_step
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(cp.id.to_string()).fg(Color::DarkGrey),
            status_cell(cp.status),
            Cell::new(next_step),
            Cell::new(cp.created_at.format("%H:%M:%S%.3f").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    println!();

    Ok(())
}
