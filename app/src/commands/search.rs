//! Search commands.

use super::session;
use crate::cli::SearchArgs;
use crate::error::CommandError;
use crate::state::AppState;
use anyhow::{Context, Result};
use scout_core::SearchCriteria;
use scout_scanner::{ControllerError, CycleOutcome, ScoutController};

pub async fn search(state: &AppState, args: SearchArgs, json: bool) -> Result<()> {
    let auto_loop = args.auto_loop;
    let criteria = SearchCriteria::from(args);
    let mut controller = state.controller()?;

    run_submit(state, &mut controller, criteria, json).await?;

    if auto_loop {
        match controller.toggle_loop() {
            Ok(_) => session::run(state, &mut controller, json).await?,
            Err(e) => {
                report_notifications(&mut controller);
                return Err(refused(e, json));
            }
        }
    }
    Ok(())
}

pub async fn more(state: &AppState, json: bool) -> Result<()> {
    let criteria = state
        .saved_criteria()
        .context("no saved search; run `scout search` first")?;
    let mut controller = state.controller()?;
    run_submit(state, &mut controller, criteria, json).await
}

async fn run_submit(
    state: &AppState,
    controller: &mut ScoutController,
    criteria: SearchCriteria,
    json: bool,
) -> Result<()> {
    tracing::info!("Searching for {}", criteria.summary());
    let outcome = controller
        .submit(criteria.clone())
        .await
        .map_err(|e| refused(e, json))?;
    state.save_criteria(&criteria)?;
    report(controller, &outcome, json)
}

/// Print a cycle result and any queued notifications.
pub(super) fn report(
    controller: &mut ScoutController,
    outcome: &CycleOutcome,
    json: bool,
) -> Result<()> {
    report_notifications(controller);

    let status = controller.status();
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    println!("{}", describe(outcome));
    println!("Leads collected: {}", status.total_found);
    Ok(())
}

fn report_notifications(controller: &mut ScoutController) {
    for notification in controller.take_notifications() {
        eprintln!("!! {notification}");
    }
}

/// Convert a refused intent into a reportable error.
pub(super) fn refused(err: ControllerError, json: bool) -> anyhow::Error {
    let err = CommandError::from(err);
    if json {
        if let Ok(body) = serde_json::to_string_pretty(&err) {
            println!("{body}");
        }
    }
    err.into()
}

pub(super) fn describe(outcome: &CycleOutcome) -> String {
    match outcome {
        CycleOutcome::Added { count } => format!("Found {count} new leads."),
        CycleOutcome::Failed { message } => format!("Search failed: {message}"),
        CycleOutcome::Halted => "API quota exhausted. Searching halted.".to_string(),
        CycleOutcome::GoalReached => "Goal reached. Auto-loop disabled.".to_string(),
        CycleOutcome::Skipped => "Nothing to do.".to_string(),
    }
}
