//! Sentence embedding backends: fastembed models and an offline hashing embedder.

use std::str::FromStr;

#[cfg(feature = "embeddings")]
use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

#[cfg(feature = "embeddings")]
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::{
    config::Settings,
    error::{LoadError, PredictError},
};

/// Produces one fixed-length vector per text.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, PredictError>;
}

/// Parsed embedding model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    AllMiniLmL6V2,
    AllMiniLmL12V2,
    BgeSmallEnV15,
    BgeBaseEnV15,
    /// Feature-hashed bag of words with the given width.
    Hashing(usize),
}

impl FromStr for ModelId {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let id = match name.to_ascii_lowercase().as_str() {
            "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => Self::AllMiniLmL6V2,
            "all-minilm-l12-v2" | "sentence-transformers/all-minilm-l12-v2" => {
                Self::AllMiniLmL12V2
            }
            "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => Self::BgeSmallEnV15,
            "bge-base-en-v1.5" | "baai/bge-base-en-v1.5" => Self::BgeBaseEnV15,
            other => {
                let dims = other
                    .strip_prefix("hashing:")
                    .ok_or_else(|| LoadError::EmbeddingModel(format!("unknown model {name:?}")))?;
                match dims.parse::<usize>() {
                    Ok(n) if n > 0 => Self::Hashing(n),
                    _ => {
                        return Err(LoadError::EmbeddingModel(format!(
                            "invalid hashing width {dims:?}"
                        )))
                    }
                }
            }
        };
        Ok(id)
    }
}

/// Build the embedder named in the settings.
pub fn load_embedder(settings: &Settings) -> Result<Box<dyn TextEmbedder>, LoadError> {
    let id: ModelId = settings.embedding_model.parse()?;
    match id {
        ModelId::Hashing(dimensions) => {
            info!(dimensions, "using hashing embedder");
            Ok(Box::new(HashingEmbedder::new(dimensions)))
        }
        #[cfg(feature = "embeddings")]
        _ => Ok(Box::new(FastEmbedder::load(
            id,
            settings.model_cache_dir.clone(),
        )?)),
        #[cfg(not(feature = "embeddings"))]
        _ => Err(LoadError::EmbeddingModel(format!(
            "{} requires the `embeddings` feature",
            settings.embedding_model
        ))),
    }
}

/// Pretrained ONNX sentence embedder backed by fastembed.
#[cfg(feature = "embeddings")]
pub struct FastEmbedder {
    // fastembed needs `&mut self` to embed.
    inner: Mutex<TextEmbedding>,
}

#[cfg(feature = "embeddings")]
impl FastEmbedder {
    pub fn load(id: ModelId, cache_dir: Option<PathBuf>) -> Result<Self, LoadError> {
        let model = match id {
            ModelId::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            ModelId::AllMiniLmL12V2 => EmbeddingModel::AllMiniLML12V2,
            ModelId::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
            ModelId::BgeBaseEnV15 => EmbeddingModel::BGEBaseENV15,
            ModelId::Hashing(_) => {
                return Err(LoadError::EmbeddingModel(
                    "hashing embedder is not a fastembed model".into(),
                ))
            }
        };
        let mut options = InitOptions::new(model.clone()).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }
        let inner = TextEmbedding::try_new(options)
            .map_err(|e| LoadError::EmbeddingModel(format!("{model:?}: {e}")))?;
        info!(?model, "loaded embedding model");
        Ok(Self {
            inner: Mutex::new(inner),
        })
    }
}

#[cfg(feature = "embeddings")]
impl TextEmbedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, PredictError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| PredictError::Embedding(format!("mutex poisoned: {e}")))?;
        guard
            .embed(vec![text], None)
            .map_err(|e| PredictError::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| PredictError::Embedding("no embedding generated".into()))
    }
}

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

/// Deterministic bag-of-words embedder that needs no model download.
///
/// Tokens are lowercased alphanumeric runs, bucketed with 64-bit FNV-1a and
/// the resulting counts are L2-normalised. Empty text embeds to zeros.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl TextEmbedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, PredictError> {
        let mut vector = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();
        for token in TOKEN.find_iter(&lower) {
            let bucket = (fnv1a(token.as_str().as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_identifiers() {
        assert_eq!(
            "all-MiniLM-L6-v2".parse::<ModelId>().unwrap(),
            ModelId::AllMiniLmL6V2
        );
        assert_eq!("hashing:16".parse::<ModelId>().unwrap(), ModelId::Hashing(16));
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert!("word2vec".parse::<ModelId>().is_err());
        assert!("hashing:0".parse::<ModelId>().is_err());
        assert!("hashing:wide".parse::<ModelId>().is_err());
    }

    #[test]
    fn hashing_is_deterministic_and_normalised() {
        let embedder = HashingEmbedder::new(32);
        let a = embedder.embed("Refund my invoice, please!").unwrap();
        let b = embedder.embed("refund MY invoice please").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_embeds_to_zeros() {
        let embedding = HashingEmbedder::new(8).embed("").unwrap();
        assert_eq!(embedding, vec![0.0; 8]);
    }

    #[test]
    fn fnv1a_matches_reference_vector() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn settings_select_hashing_embedder() {
        let settings = Settings {
            embedding_model: "hashing:4".into(),
            ..Settings::default()
        };
        let embedder = load_embedder(&settings).unwrap();
        assert_eq!(embedder.embed("hello").unwrap().len(), 4);
    }
}
