//! Entry point wiring CLI dispatch to the triage pipeline.

use std::process::ExitCode;

use anyhow::Result;
use ticket_triage::{cli::Cli, config::Settings, logging};
use tracing::{debug, instrument};

#[instrument]
fn main() -> Result<ExitCode> {
    logging::init_tracing()?;
    let settings = Settings::load();
    let cli = Cli::parse();

    debug!(?cli, "starting command");
    cli.dispatch(settings)
}
