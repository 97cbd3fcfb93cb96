//! Multi-output linear classifier over sentence embeddings.

use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{LoadError, PredictError},
    nlp::{read_json, Category, PerCategory},
};

/// Maps one embedding to one class code per category.
pub trait Classifier: Send + Sync {
    fn predict(&self, embedding: &[f32]) -> Result<PerCategory<usize>, PredictError>;
}

/// On-disk layout of a single head: `weights` is classes x dimensions.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHead {
    weights: Vec<Vec<f32>>,
    intercepts: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClassifier {
    dimensions: usize,
    heads: PerCategory<RawHead>,
}

/// Scores for one category: `logits = weights . x + intercepts`.
#[derive(Debug, Clone)]
pub struct LinearHead {
    weights: Array2<f32>,
    intercepts: Array1<f32>,
}

impl LinearHead {
    pub fn new(weights: Array2<f32>, intercepts: Array1<f32>) -> Result<Self, String> {
        if weights.nrows() == 0 {
            return Err("head has no classes".into());
        }
        if weights.nrows() != intercepts.len() {
            return Err(format!(
                "{} weight rows but {} intercepts",
                weights.nrows(),
                intercepts.len()
            ));
        }
        if weights.iter().chain(intercepts.iter()).any(|v| !v.is_finite()) {
            return Err("non-finite parameter".into());
        }
        Ok(Self {
            weights,
            intercepts,
        })
    }

    pub fn classes(&self) -> usize {
        self.weights.nrows()
    }

    /// Index of the highest logit; ties resolve to the lowest index.
    fn argmax(&self, x: ArrayView1<'_, f32>) -> usize {
        let logits = self.weights.dot(&x) + &self.intercepts;
        let mut best = 0;
        for (idx, &value) in logits.iter().enumerate().skip(1) {
            if value > logits[best] {
                best = idx;
            }
        }
        best
    }

    fn from_raw(raw: RawHead, dimensions: usize) -> Result<Self, String> {
        let rows = raw.weights.len();
        if let Some(row) = raw.weights.iter().find(|row| row.len() != dimensions) {
            return Err(format!(
                "weight row has {} columns, expected {dimensions}",
                row.len()
            ));
        }
        let flat: Vec<f32> = raw.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((rows, dimensions), flat).map_err(|e| e.to_string())?;
        Self::new(weights, Array1::from(raw.intercepts))
    }
}

/// One [`LinearHead`] per category sharing an input dimensionality.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    dimensions: usize,
    heads: PerCategory<LinearHead>,
}

impl LinearClassifier {
    pub fn new(dimensions: usize, heads: PerCategory<LinearHead>) -> Result<Self, String> {
        if dimensions == 0 {
            return Err("dimensions must be positive".into());
        }
        heads.try_map(|category, head| {
            if head.weights.ncols() == dimensions {
                Ok(())
            } else {
                Err(format!(
                    "{category} head has {} columns, expected {dimensions}",
                    head.weights.ncols()
                ))
            }
        })?;
        Ok(Self { dimensions, heads })
    }

    /// Load the classifier artifact and validate its shapes.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw: RawClassifier = read_json(path)?;
        let dimensions = raw.dimensions;
        let RawClassifier { heads, .. } = raw;
        let convert = |category: Category, head: RawHead| {
            LinearHead::from_raw(head, dimensions)
                .map_err(|reason| LoadError::invalid(path, format!("{category} head: {reason}")))
        };
        let heads = PerCategory {
            queue: convert(Category::Queue, heads.queue)?,
            priority: convert(Category::Priority, heads.priority)?,
            sentiment: convert(Category::Sentiment, heads.sentiment)?,
        };
        let classifier = Self::new(dimensions, heads).map_err(|reason| LoadError::invalid(path, reason))?;
        info!(
            path = %path.display(),
            dimensions,
            "loaded classifier"
        );
        Ok(classifier)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of classes each head can emit.
    pub fn class_counts(&self) -> PerCategory<usize> {
        PerCategory {
            queue: self.heads.queue.classes(),
            priority: self.heads.priority.classes(),
            sentiment: self.heads.sentiment.classes(),
        }
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, embedding: &[f32]) -> Result<PerCategory<usize>, PredictError> {
        if embedding.len() != self.dimensions {
            return Err(PredictError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            });
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(PredictError::MalformedEmbedding);
        }
        let x = ArrayView1::from(embedding);
        Ok(PerCategory {
            queue: self.heads.queue.argmax(x),
            priority: self.heads.priority.argmax(x),
            sentiment: self.heads.sentiment.argmax(x),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use ndarray::array;

    use super::*;

    fn head(weights: Array2<f32>, intercepts: Array1<f32>) -> LinearHead {
        LinearHead::new(weights, intercepts).unwrap()
    }

    fn classifier() -> LinearClassifier {
        LinearClassifier::new(
            2,
            PerCategory {
                queue: head(array![[1.0, 0.0], [0.0, 1.0]], array![0.0, 0.0]),
                priority: head(array![[0.0, 0.0], [0.0, 0.0]], array![0.0, 0.5]),
                sentiment: head(array![[1.0, 1.0]], array![0.0]),
            },
        )
        .unwrap()
    }

    #[test]
    fn picks_highest_logit_per_head() {
        let codes = classifier().predict(&[0.2, 0.9]).unwrap();
        assert_eq!(codes.queue, 1);
        assert_eq!(codes.priority, 1);
        assert_eq!(codes.sentiment, 0);
    }

    #[test]
    fn ties_resolve_to_lowest_code() {
        let codes = classifier().predict(&[0.5, 0.5]).unwrap();
        assert_eq!(codes.queue, 0);
    }

    #[test]
    fn rejects_wrong_dimensions() {
        let err = classifier().predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            PredictError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn rejects_non_finite_embedding() {
        let err = classifier().predict(&[f32::NAN, 0.0]).unwrap_err();
        assert_eq!(err, PredictError::MalformedEmbedding);
    }

    #[test]
    fn head_shape_mismatch_is_an_error() {
        assert!(LinearHead::new(array![[1.0, 0.0]], array![0.0, 1.0]).is_err());
    }

    #[test]
    fn loads_json_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dimensions":2,"heads":{{
                "queue":{{"weights":[[1,0],[0,1],[1,1]],"intercepts":[0,0,-5]}},
                "priority":{{"weights":[[0,1]],"intercepts":[0]}},
                "sentiment":{{"weights":[[1,0],[0,1]],"intercepts":[0,0]}}}}}}"#
        )
        .unwrap();
        let classifier = LinearClassifier::load(file.path()).unwrap();
        assert_eq!(classifier.dimensions(), 2);
        assert_eq!(classifier.class_counts().queue, 3);
        assert_eq!(classifier.predict(&[0.0, 1.0]).unwrap().queue, 1);
    }

    #[test]
    fn ragged_weights_fail_to_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dimensions":2,"heads":{{
                "queue":{{"weights":[[1,0],[0]],"intercepts":[0,0]}},
                "priority":{{"weights":[[0,1]],"intercepts":[0]}},
                "sentiment":{{"weights":[[1,0]],"intercepts":[0]}}}}}}"#
        )
        .unwrap();
        let err = LinearClassifier::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("queue head"));
    }
}
