//! Interactive auto-loop session.
//!
//! Timer ticks, stdin commands and Ctrl-C are multiplexed with `select!` and
//! handled one at a time on this task, so a tick never overlaps a command.

use super::search::{refused, report};
use crate::state::AppState;
use anyhow::{Context, Result};
use scout_scanner::{CycleOutcome, ScoutController};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands: more, loop, status, export [path], emails, clear, help, quit";

/// A line typed during an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    More,
    ToggleLoop,
    Status,
    Export(Option<PathBuf>),
    Emails,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_session_command(line: &str) -> Option<SessionCommand> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?.to_lowercase();
    let command = match word.as_str() {
        "more" | "m" => SessionCommand::More,
        "loop" | "l" => SessionCommand::ToggleLoop,
        "status" | "s" => SessionCommand::Status,
        "export" | "e" => SessionCommand::Export(parts.next().map(PathBuf::from)),
        "emails" => SessionCommand::Emails,
        "clear" => SessionCommand::Clear,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        _ => SessionCommand::Unknown(word),
    };
    Some(command)
}

enum Event {
    Tick,
    Line(Option<String>),
    Interrupt,
}

/// Drive the controller until the user quits or stdin closes.
pub async fn run(state: &AppState, controller: &mut ScoutController, json: bool) -> Result<()> {
    eprintln!(
        "Auto-loop running every {}s. {HELP}",
        state.config.scout.loop_interval_secs
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        let event = tokio::select! {
            () = controller.wait_for_tick() => Event::Tick,
            line = lines.next_line() => Event::Line(line.context("failed to read stdin")?),
            _ = &mut interrupt => Event::Interrupt,
        };

        match event {
            Event::Tick => {
                let outcome = controller.tick().await;
                if outcome != CycleOutcome::Skipped {
                    report(controller, &outcome, json)?;
                }
            }
            Event::Line(None) | Event::Interrupt => break,
            Event::Line(Some(line)) => {
                let Some(command) = parse_session_command(&line) else {
                    continue;
                };
                if command == SessionCommand::Quit {
                    break;
                }
                if let Err(e) = handle(controller, command, json).await {
                    eprintln!("error: {e:#}");
                }
            }
        }
    }

    tracing::info!("Interactive session ended");
    Ok(())
}

async fn handle(
    controller: &mut ScoutController,
    command: SessionCommand,
    json: bool,
) -> Result<()> {
    match command {
        SessionCommand::More => {
            let outcome = controller.find_more().await.map_err(|e| refused(e, json))?;
            report(controller, &outcome, json)?;
        }
        SessionCommand::ToggleLoop => {
            let looping = controller.toggle_loop();
            for notification in controller.take_notifications() {
                eprintln!("!! {notification}");
            }
            let looping = looping.map_err(|e| refused(e, json))?;
            println!("Auto-loop {}.", if looping { "enabled" } else { "disabled" });
        }
        SessionCommand::Status => {
            let status = controller.status();
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!(
                    "Leads: {} | looping: {} | quota halted: {}",
                    status.total_found, status.is_looping, status.is_quota_halted
                );
                for entry in &status.logs {
                    println!("  {entry}");
                }
            }
        }
        SessionCommand::Export(path) => {
            let csv = controller.export_csv().map_err(|e| refused(e, json))?;
            match path {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported {} leads to {}", controller.leads().len(), path.display());
                }
                None => print!("{csv}"),
            }
        }
        SessionCommand::Emails => println!("{}", controller.copy_emails()),
        SessionCommand::Clear => {
            controller.clear_all();
            println!("Cleared all leads.");
        }
        SessionCommand::Help => eprintln!("{HELP}"),
        SessionCommand::Unknown(word) => eprintln!("Unknown command '{word}'. {HELP}"),
        SessionCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_session_command("more"), Some(SessionCommand::More));
        assert_eq!(parse_session_command("  LOOP "), Some(SessionCommand::ToggleLoop));
        assert_eq!(
            parse_session_command("export leads.csv"),
            Some(SessionCommand::Export(Some(PathBuf::from("leads.csv"))))
        );
        assert_eq!(parse_session_command("export"), Some(SessionCommand::Export(None)));
        assert_eq!(parse_session_command("q"), Some(SessionCommand::Quit));
        assert_eq!(
            parse_session_command("dance"),
            Some(SessionCommand::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_blank_line_ignored() {
        assert_eq!(parse_session_command("   "), None);
    }
}
