//! Command-line interface wiring for ticket-triage.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::Settings;

pub mod heuristic;
pub mod inspect;
pub mod predict;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Support ticket triage; run `predict [TEXT]` for a JSON prediction",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<ExitCode> {
        match self.command {
            Commands::Predict(args) => predict::run(args, settings),
            Commands::Inspect => inspect::run(settings),
            Commands::Heuristic(args) => heuristic::run(args),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict queue, priority and sentiment with the trained models.
    Predict(predict::Args),
    /// Print a summary of the classifier and label encoders.
    Inspect,
    /// Triage with keyword rules only.
    Heuristic(heuristic::Args),
}

/// Write `value` to stdout as a single line of JSON.
pub(crate) fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
