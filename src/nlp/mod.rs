//! Inference layer: embed ticket text, classify it, decode the labels.

pub mod classifier;
pub mod embeddings;
pub mod heuristics;
pub mod labels;
pub mod predictor;

use std::{fmt, fs, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::LoadError;

pub use classifier::{Classifier, LinearClassifier};
pub use embeddings::TextEmbedder;
pub use labels::{LabelEncoder, LabelEncoders};
pub use predictor::{LoadFailure, Outcome, Prediction, Predictor};

/// One output head of the multi-output classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Queue,
    Priority,
    Sentiment,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Queue, Self::Priority, Self::Sentiment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Priority => "priority",
            Self::Sentiment => "sentiment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value for each output category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PerCategory<T> {
    pub queue: T,
    pub priority: T,
    pub sentiment: T,
}

impl<T> PerCategory<T> {
    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Queue => &self.queue,
            Category::Priority => &self.priority,
            Category::Sentiment => &self.sentiment,
        }
    }

    /// Apply `f` to every category, short-circuiting on the first error.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(Category, &T) -> Result<U, E>,
    ) -> Result<PerCategory<U>, E> {
        Ok(PerCategory {
            queue: f(Category::Queue, &self.queue)?,
            priority: f(Category::Priority, &self.priority)?,
            sentiment: f(Category::Sentiment, &self.sentiment)?,
        })
    }
}

/// Read and deserialize a JSON artifact.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
