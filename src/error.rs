//! Error types for artifact loading and single predictions.

use std::path::PathBuf;

use thiserror::Error;

use crate::nlp::Category;

/// Failure to bring up the predictor. Always fatal to the process.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid artifact {}: {reason}", .path.display())]
    InvalidArtifact { path: PathBuf, reason: String },
    #[error("failed to load embedding model: {0}")]
    EmbeddingModel(String),
}

impl LoadError {
    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failure during one prediction. Recovered locally into the fallback labels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("embedding has {actual} dimensions, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("embedding contains non-finite values")]
    MalformedEmbedding,
    #[error("classifier returned code {code} outside the {category} encoder")]
    UnknownCode { category: Category, code: usize },
    #[error("classifier failed: {0}")]
    Classifier(String),
}
