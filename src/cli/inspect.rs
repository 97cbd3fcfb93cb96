//! CLI entry-point for summarising the deployed classifier artifacts.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument;

use crate::{
    cli::emit_json,
    config::Settings,
    nlp::{predictor::load_artifacts, LabelEncoders},
};

#[derive(Debug, Serialize)]
struct Summary<'a> {
    classifier: &'a PathBuf,
    encoders: &'a PathBuf,
    dimensions: usize,
    classes: &'a LabelEncoders,
}

#[instrument(skip(settings))]
pub fn run(settings: Settings) -> Result<ExitCode> {
    let (classifier, encoders) =
        load_artifacts(&settings).context("loading classifier artifacts")?;
    emit_json(&Summary {
        classifier: &settings.classifier_path,
        encoders: &settings.encoders_path,
        dimensions: classifier.dimensions(),
        classes: &encoders,
    })?;
    Ok(ExitCode::SUCCESS)
}
