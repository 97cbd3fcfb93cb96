//! CLI entry-point for keyword triage without model artifacts.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use crate::{
    cli::{emit_json, predict::DEFAULT_TEXT},
    nlp::{heuristics::KeywordTriage, Prediction},
};

/// Args for the `heuristic` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Ticket message to triage.
    #[arg(default_value = DEFAULT_TEXT, allow_hyphen_values = true)]
    pub text: String,
}

/// Prediction labels plus the numeric priority ticketing backends store.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    prediction: Prediction,
    priority_rank: u8,
}

#[instrument]
pub fn run(args: Args) -> Result<ExitCode> {
    let triage = KeywordTriage::classify(&args.text);
    let priority_rank = triage.priority.rank();
    emit_json(&Report {
        prediction: triage.into(),
        priority_rank,
    })?;
    Ok(ExitCode::SUCCESS)
}
