//! Runtime configuration utilities for ticket-triage.

use std::{env, path::PathBuf};

use serde::Deserialize;

/// Identifier of the sentence-embedding model used when nothing is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
/// Classifier artifact path, relative to the working directory.
pub const DEFAULT_CLASSIFIER_PATH: &str = "multi_output_model.json";
/// Label encoders artifact path, relative to the working directory.
pub const DEFAULT_ENCODERS_PATH: &str = "label_encoders.json";

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Embedding model identifier, e.g. `all-MiniLM-L6-v2` or `hashing:384`.
    pub embedding_model: String,
    /// Multi-output classifier artifact.
    pub classifier_path: PathBuf,
    /// Label encoders artifact keyed by category.
    pub encoders_path: PathBuf,
    /// Where downloaded embedding models are cached; fastembed's default when unset.
    pub model_cache_dir: Option<PathBuf>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        let embedding_model = env::var("TRIAGE_EMBEDDING_MODEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
        let classifier_path = env::var("TRIAGE_CLASSIFIER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CLASSIFIER_PATH));
        let encoders_path = env::var("TRIAGE_ENCODERS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENCODERS_PATH));
        let model_cache_dir = env::var("TRIAGE_MODEL_CACHE_DIR").ok().map(PathBuf::from);

        Self {
            embedding_model,
            classifier_path,
            encoders_path,
            model_cache_dir,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            classifier_path: PathBuf::from(DEFAULT_CLASSIFIER_PATH),
            encoders_path: PathBuf::from(DEFAULT_ENCODERS_PATH),
            model_cache_dir: None,
        }
    }
}
