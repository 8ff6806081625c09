//! TF-IDF feature encoder loaded from a JSON export of a fitted vectorizer.
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "vocabulary": {"python": 0, "machine learning": 1},
//!   "idf": [1.69, 2.10],
//!   "lowercase": true,
//!   "sublinear_tf": false,
//!   "norm": "l2",
//!   "ngram_range": [1, 2],
//!   "stop_words": ["and", "the"]
//! }
//! ```
//!
//! Only `vocabulary` and `idf` are required; the rest default to the usual
//! vectorizer defaults (lowercase, raw counts, l2, unigrams, no stop words).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use super::{ArtifactError, FeatureVector};

const KIND: &str = "Vectorizer";
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("term '{term}' maps to column {index} but the vectorizer has {width} columns")]
    IndexOutOfRange {
        term: String,
        index: usize,
        width: usize,
    },

    #[error("non-finite feature value in column {0}")]
    NonFinite(usize),
}

/// Turns raw text into a fixed-length feature vector.
pub trait FeatureEncoder: Send + Sync {
    fn dimension(&self) -> usize;

    fn transform(&self, text: &str) -> Result<FeatureVector, EncodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

#[derive(Debug, Deserialize)]
struct TfidfArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

pub struct TfidfEncoder {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    token_re: Regex,
}

impl TfidfEncoder {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound {
                kind: KIND,
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            kind: KIND,
            path: path.to_path_buf(),
            source,
        })?;
        let invalid = |reason: String| ArtifactError::Invalid {
            kind: KIND,
            path: path.to_path_buf(),
            reason,
        };
        let artifact: TfidfArtifact =
            serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
        Self::from_artifact(artifact).map_err(invalid)
    }

    fn from_artifact(artifact: TfidfArtifact) -> Result<Self, String> {
        if artifact.idf.is_empty() {
            return Err("idf vector is empty".to_string());
        }
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }
        let token_re = Regex::new(TOKEN_PATTERN).map_err(|e| e.to_string())?;
        let stop_words = artifact
            .stop_words
            .into_iter()
            .map(|w| if artifact.lowercase { w.to_lowercase() } else { w })
            .collect();

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            ngram_range: artifact.ngram_range,
            stop_words,
            token_re,
        })
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = self
            .token_re
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

impl FeatureEncoder for TfidfEncoder {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Result<FeatureVector, EncodeError> {
        let width = self.idf.len();
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in self.terms(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                if index >= width {
                    return Err(EncodeError::IndexOutOfRange { term, index, width });
                }
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut values = vec![0.0f32; width];
        for (index, count) in counts {
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            values[index] = tf * self.idf[index];
        }

        let total = match self.norm {
            Some(Norm::L2) => values.iter().map(|v| v * v).sum::<f32>().sqrt(),
            Some(Norm::L1) => values.iter().map(|v| v.abs()).sum::<f32>(),
            None => 1.0,
        };
        if total > 0.0 && total != 1.0 {
            values.iter_mut().for_each(|v| *v /= total);
        }

        if let Some(column) = values.iter().position(|v| !v.is_finite()) {
            return Err(EncodeError::NonFinite(column));
        }
        Ok(FeatureVector::new(values))
    }
}
