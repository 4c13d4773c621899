//! Scout command-line application shell.
//!
//! This is the thin shell that parses arguments, wires configuration and
//! storage, and hands intents to the controller. Core logic lives in the
//! `crates/` directory.

pub mod cli;
mod commands;
mod error;
mod state;

pub use cli::Cli;
pub use error::CommandError;
pub use state::AppState;

use tracing::info;

/// Initialize tracing subscriber for logging.
///
/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,scout=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run the application with parsed arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Scout v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::load()?;
    commands::execute(cli, &state).await
}
