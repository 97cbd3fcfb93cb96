//! Label encoders mapping classifier codes back to category names.

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::LoadError,
    nlp::{read_json, PerCategory},
};

/// Ordered class names; code `i` decodes to `classes[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<S: Into<String>>(classes: impl IntoIterator<Item = S>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("no classes".into());
        }
        let mut seen = HashSet::new();
        for class in &self.classes {
            if class.trim().is_empty() {
                return Err("empty class name".into());
            }
            if !seen.insert(class.as_str()) {
                return Err(format!("duplicate class {class:?}"));
            }
        }
        Ok(())
    }
}

/// The queue, priority and sentiment encoders trained alongside the classifier.
pub type LabelEncoders = PerCategory<LabelEncoder>;

impl LabelEncoders {
    /// Load and validate the encoders artifact.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let encoders: Self = read_json(path)?;
        encoders.try_map(|category, encoder| {
            encoder
                .validate()
                .map_err(|reason| LoadError::invalid(path, format!("{category} encoder: {reason}")))
        })?;
        info!(
            path = %path.display(),
            queue = encoders.queue.len(),
            priority = encoders.priority.len(),
            sentiment = encoders.sentiment.len(),
            "loaded label encoders"
        );
        Ok(encoders)
    }
}
