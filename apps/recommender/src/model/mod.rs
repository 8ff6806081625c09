//! Startup-loaded artifacts: the feature encoder, the category scorer and the
//! category mapping. They are bundled into an immutable [`ModelContext`] that is
//! built once and shared read-only for the lifetime of the process.
//!
//! Both the encoder and the scorer sit behind traits so the artifact formats stay
//! pluggable; the trained adapters are `TfidfEncoder` and `MlpClassifier`, and
//! [`ModelContext::keyword_fallback`] swaps both for keyword counting.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub mod classifier;
pub mod encoder;
pub mod keyword;
pub mod mapping;

pub use classifier::{CategoryScorer, MlpClassifier, ScoreError};
pub use encoder::{EncodeError, FeatureEncoder, TfidfEncoder};
pub use keyword::{KeywordEncoder, KeywordScorer};
pub use mapping::CategoryMapping;

/// Errors that make the system impossible to construct. There is no fallback for these.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{kind} file not found: {}", path.display())]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("Failed to read {kind} file {}: {source}", path.display())]
    Io {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {kind} file {}: {reason}", path.display())]
    Invalid {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Vectorizer produces {encoder} features but the classifier expects {scorer}")]
    WidthMismatch { encoder: usize, scorer: usize },
}

/// Fixed-length numeric encoding of one resume.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn zeros(width: usize) -> Self {
        Self(vec![0.0; width])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Output of [`ModelContext::encode`]. `degraded` is set when the encoder failed and
/// the features were replaced by a zero vector.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub features: FeatureVector,
    pub degraded: bool,
}

pub struct ModelContext {
    encoder: Box<dyn FeatureEncoder>,
    scorer: Box<dyn CategoryScorer>,
    mapping: CategoryMapping,
}

impl ModelContext {
    /// Bundles already-loaded components. The encoder width must match the scorer input.
    pub fn new(
        encoder: Box<dyn FeatureEncoder>,
        scorer: Box<dyn CategoryScorer>,
        mapping: CategoryMapping,
    ) -> Result<Self, ArtifactError> {
        if encoder.dimension() != scorer.input_width() {
            return Err(ArtifactError::WidthMismatch {
                encoder: encoder.dimension(),
                scorer: scorer.input_width(),
            });
        }
        Ok(Self {
            encoder,
            scorer,
            mapping,
        })
    }

    /// Loads the classifier, then the vectorizer, then the job mapping.
    /// A missing or unreadable mapping is not fatal; labels are synthesized instead.
    pub fn load(
        model_path: &Path,
        vectorizer_path: &Path,
        mapping_path: &Path,
    ) -> Result<Self, ArtifactError> {
        let scorer = MlpClassifier::load(model_path)?;
        info!(
            "Classifier loaded from {} ({} inputs, {} categories)",
            model_path.display(),
            scorer.input_width(),
            scorer.category_count()
        );

        let encoder = TfidfEncoder::load(vectorizer_path)?;
        info!(
            "Vectorizer loaded from {} ({} features)",
            vectorizer_path.display(),
            encoder.dimension()
        );

        let mapping = CategoryMapping::load_or_synthesize(mapping_path, scorer.category_count());

        Self::new(Box::new(encoder), Box::new(scorer), mapping)
    }

    /// Keyword counting in place of the trained artifacts. Nothing is read from disk.
    pub fn keyword_fallback() -> Self {
        info!(
            "Using keyword scoring over {} job categories",
            keyword::KEYWORD_CATEGORIES.len()
        );
        Self {
            encoder: Box::new(KeywordEncoder),
            scorer: Box::new(KeywordScorer),
            mapping: keyword::keyword_mapping(),
        }
    }

    /// Never fails: an encoder fault yields a zero vector of the scorer's input width.
    pub fn encode(&self, text: &str) -> Encoded {
        match self.encoder.transform(text) {
            Ok(features) => Encoded {
                features,
                degraded: false,
            },
            Err(e) => {
                warn!("Error during preprocessing, using zero features: {e}");
                Encoded {
                    features: FeatureVector::zeros(self.scorer.input_width()),
                    degraded: true,
                }
            }
        }
    }

    pub fn score(&self, features: &FeatureVector) -> Result<Vec<f32>, ScoreError> {
        self.scorer.score(features)
    }

    pub fn calibrate(&self, score: f32) -> f32 {
        self.scorer.calibrate(score)
    }

    pub fn mapping(&self) -> &CategoryMapping {
        &self.mapping
    }
}
