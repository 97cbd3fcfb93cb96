//! Ticket predictor: embed, classify, decode.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::Settings,
    error::{LoadError, PredictError},
    nlp::{
        classifier::{Classifier, LinearClassifier},
        embeddings::{self, TextEmbedder},
        labels::LabelEncoders,
        Category,
    },
};

/// Decoded triage labels for one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub queue: String,
    pub priority: String,
    pub sentiment: String,
}

impl Prediction {
    /// Labels returned when a single prediction fails.
    pub fn fallback() -> Self {
        Self {
            queue: "general".into(),
            priority: "low".into(),
            sentiment: "neutral".into(),
        }
    }
}

/// Payload printed when the artifacts could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub error: String,
    pub queue: String,
    pub priority: String,
    pub sentiment: String,
}

impl LoadFailure {
    pub fn new(error: &LoadError) -> Self {
        Self {
            error: error.to_string(),
            queue: "technical".into(),
            priority: "low".into(),
            sentiment: "neutral".into(),
        }
    }
}

/// Result of [`Predictor::predict`]: a real prediction or a tagged fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Predicted(Prediction),
    Fallback { reason: PredictError },
}

impl Outcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The labels to report, substituting the fallback labels on failure.
    pub fn prediction(&self) -> Prediction {
        match self {
            Self::Predicted(prediction) => prediction.clone(),
            Self::Fallback { .. } => Prediction::fallback(),
        }
    }

    pub fn into_prediction(self) -> Prediction {
        match self {
            Self::Predicted(prediction) => prediction,
            Self::Fallback { .. } => Prediction::fallback(),
        }
    }
}

/// Immutable bundle of embedding model, classifier and label encoders.
pub struct Predictor {
    embedder: Box<dyn TextEmbedder>,
    classifier: Box<dyn Classifier>,
    encoders: LabelEncoders,
}

impl Predictor {
    pub fn new(
        embedder: Box<dyn TextEmbedder>,
        classifier: Box<dyn Classifier>,
        encoders: LabelEncoders,
    ) -> Self {
        Self {
            embedder,
            classifier,
            encoders,
        }
    }

    /// Load every artifact named in `settings`.
    ///
    /// Local files are read before the embedding model so a broken deployment
    /// is reported without touching the model cache.
    #[instrument(skip_all, fields(model = %settings.embedding_model))]
    pub fn load(settings: &Settings) -> Result<Self, LoadError> {
        let (classifier, encoders) = load_artifacts(settings)?;
        let embedder = embeddings::load_embedder(settings)?;
        Ok(Self::new(embedder, Box::new(classifier), encoders))
    }

    pub fn encoders(&self) -> &LabelEncoders {
        &self.encoders
    }

    /// Predict labels for `text`, degrading to the fallback on any failure.
    pub fn predict(&self, text: &str) -> Outcome {
        match self.try_predict(text) {
            Ok(prediction) => {
                debug!(?prediction, "predicted ticket labels");
                Outcome::Predicted(prediction)
            }
            Err(reason) => {
                warn!(%reason, "prediction failed; using fallback labels");
                Outcome::Fallback { reason }
            }
        }
    }

    /// Predict labels for `text`, surfacing the first failure.
    pub fn try_predict(&self, text: &str) -> Result<Prediction, PredictError> {
        let embedding = self.embedder.embed(text)?;
        let codes = self.classifier.predict(&embedding)?;
        let labels = codes.try_map(|category, &code| self.decode(category, code))?;
        Ok(Prediction {
            queue: labels.queue,
            priority: labels.priority,
            sentiment: labels.sentiment,
        })
    }

    fn decode(&self, category: Category, code: usize) -> Result<String, PredictError> {
        self.encoders
            .get(category)
            .decode(code)
            .map(str::to_string)
            .ok_or(PredictError::UnknownCode { category, code })
    }
}

/// Load and cross-check the classifier and label encoders.
pub fn load_artifacts(settings: &Settings) -> Result<(LinearClassifier, LabelEncoders), LoadError> {
    let classifier = LinearClassifier::load(&settings.classifier_path)?;
    let encoders = LabelEncoders::load(&settings.encoders_path)?;
    let counts = classifier.class_counts();
    for category in Category::ALL {
        let heads = *counts.get(category);
        let classes = encoders.get(category).len();
        if heads != classes {
            return Err(LoadError::invalid(
                &settings.classifier_path,
                format!(
                    "{category} head emits {heads} classes but {} has {classes}",
                    settings.encoders_path.display()
                ),
            ));
        }
    }
    Ok((classifier, encoders))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{LabelEncoder, PerCategory};

    struct Constant(Vec<f32>);

    impl TextEmbedder for Constant {
        fn embed(&self, _text: &str) -> Result<Vec<f32>, PredictError> {
            Ok(self.0.clone())
        }
    }

    struct Codes(usize, usize, usize);

    impl Classifier for Codes {
        fn predict(&self, _embedding: &[f32]) -> Result<PerCategory<usize>, PredictError> {
            Ok(PerCategory {
                queue: self.0,
                priority: self.1,
                sentiment: self.2,
            })
        }
    }

    fn encoders() -> LabelEncoders {
        PerCategory {
            queue: LabelEncoder::new(["billing", "technical"]),
            priority: LabelEncoder::new(["high", "low", "medium"]),
            sentiment: LabelEncoder::new(["negative", "neutral", "positive"]),
        }
    }

    #[test]
    fn decodes_codes_into_labels() {
        let predictor = Predictor::new(
            Box::new(Constant(vec![0.0])),
            Box::new(Codes(0, 0, 2)),
            encoders(),
        );
        let outcome = predictor.predict("double charge");
        assert_eq!(
            outcome,
            Outcome::Predicted(Prediction {
                queue: "billing".into(),
                priority: "high".into(),
                sentiment: "positive".into(),
            })
        );
    }

    #[test]
    fn unknown_code_is_reported_explicitly() {
        let predictor = Predictor::new(
            Box::new(Constant(vec![0.0])),
            Box::new(Codes(0, 7, 0)),
            encoders(),
        );
        assert_eq!(
            predictor.try_predict("anything").unwrap_err(),
            PredictError::UnknownCode {
                category: Category::Priority,
                code: 7
            }
        );
        let outcome = predictor.predict("anything");
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_prediction(), Prediction::fallback());
    }

    #[test]
    fn load_failure_carries_conservative_labels() {
        let failure = LoadFailure::new(&LoadError::EmbeddingModel("offline".into()));
        assert_eq!(failure.queue, "technical");
        assert_eq!(failure.priority, "low");
        assert_eq!(failure.sentiment, "neutral");
        assert!(failure.error.contains("offline"));
    }
}
