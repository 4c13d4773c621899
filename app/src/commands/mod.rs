//! Command handlers.

mod leads;
mod search;
mod session;

use crate::cli::{Cli, Commands};
use crate::state::AppState;
use anyhow::Result;

/// Run the parsed command.
pub async fn execute(cli: Cli, state: &AppState) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Search(args) => search::search(state, args, json).await,
        Commands::More => search::more(state, json).await,
        Commands::Export { output } => leads::export(state, output.as_deref()),
        Commands::Emails => {
            leads::emails(state);
            Ok(())
        }
        Commands::Clear => leads::clear(state),
        Commands::Status => leads::status(state, json),
    }
}
