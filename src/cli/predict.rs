//! CLI entry-point for predicting a ticket's queue, priority and sentiment.

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{error, info, instrument};

use crate::{
    cli::emit_json,
    config::Settings,
    nlp::{LoadFailure, Predictor},
};

/// Ticket text used when none is given on the command line.
pub const DEFAULT_TEXT: &str = "Default ticket message for testing";

/// Args for the `predict` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Ticket message to triage.
    #[arg(default_value = DEFAULT_TEXT, allow_hyphen_values = true)]
    pub text: String,
    /// Classifier artifact, overriding TRIAGE_CLASSIFIER_PATH.
    #[arg(long)]
    pub classifier: Option<PathBuf>,
    /// Label encoders artifact, overriding TRIAGE_ENCODERS_PATH.
    #[arg(long)]
    pub encoders: Option<PathBuf>,
    /// Embedding model identifier, overriding TRIAGE_EMBEDDING_MODEL.
    #[arg(long)]
    pub model: Option<String>,
}

impl Args {
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(path) = &self.classifier {
            settings.classifier_path = path.clone();
        }
        if let Some(path) = &self.encoders {
            settings.encoders_path = path.clone();
        }
        if let Some(model) = &self.model {
            settings.embedding_model = model.clone();
        }
        settings
    }
}

#[instrument(skip_all)]
pub fn run(args: Args, settings: Settings) -> Result<ExitCode> {
    let settings = args.apply(settings);
    let predictor = match Predictor::load(&settings) {
        Ok(predictor) => predictor,
        Err(err) => {
            error!(error = %err, "failed to load triage artifacts");
            emit_json(&LoadFailure::new(&err))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let outcome = predictor.predict(&args.text);
    info!(fallback = outcome.is_fallback(), "ticket triaged");
    emit_json(&outcome.into_prediction())?;
    Ok(ExitCode::SUCCESS)
}
