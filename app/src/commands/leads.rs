//! Commands that work on the stored collection without a provider.

use crate::state::AppState;
use anyhow::{Context, Result};
use scout_core::{emails_for_clipboard, leads_to_csv};
use serde_json::json;
use std::path::Path;

pub fn export(state: &AppState, output: Option<&Path>) -> Result<()> {
    let leads = state.leads();
    let csv = leads_to_csv(&leads).context("failed to render CSV")?;

    match output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported {} leads to {}", leads.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

pub fn emails(state: &AppState) {
    let emails = emails_for_clipboard(&state.leads());
    if !emails.is_empty() {
        println!("{emails}");
    }
}

pub fn clear(state: &AppState) -> Result<()> {
    let count = state.leads().len();
    state.clear_leads()?;
    println!("Cleared {count} leads.");
    Ok(())
}

pub fn status(state: &AppState, json: bool) -> Result<()> {
    let leads = state.leads();
    let criteria = state.saved_criteria();

    if json {
        let body = json!({
            "totalFound": leads.len(),
            "criteria": criteria,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("Leads collected: {}", leads.len());
    match criteria {
        Some(c) => println!("Last search: {} (goal {})", c.summary(), c.results_amount),
        None => println!("Last search: none"),
    }
    Ok(())
}
