//! Job-category classifier.
//!
//! The trained network is opaque to the rest of the system: callers only see
//! [`CategoryScorer`]. The bundled adapter, [`MlpClassifier`], runs a feed-forward
//! network exported to safetensors as `dense_{i}.weight` `(out, in)` and
//! `dense_{i}.bias` `(out)` for consecutive `i` starting at 0. Hidden layers use ReLU
//! and the output goes through softmax.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Linear, Module};
use thiserror::Error;
use tracing::warn;

use super::{ArtifactError, FeatureVector};

const KIND: &str = "Model";
/// Anything smaller than this cannot hold a useful network.
const MIN_MODEL_BYTES: u64 = 1000;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("feature vector has {actual} values, the classifier expects {expected}")]
    InputWidth { expected: usize, actual: usize },

    #[error("model inference failed: {0}")]
    Model(#[from] candle_core::Error),
}

/// Maps a feature vector to one score per job category.
pub trait CategoryScorer: Send + Sync {
    fn input_width(&self) -> usize;

    fn category_count(&self) -> usize;

    fn score(&self, features: &FeatureVector) -> Result<Vec<f32>, ScoreError>;

    /// Turns a ranking score into the confidence reported to callers.
    fn calibrate(&self, score: f32) -> f32 {
        score
    }
}

pub struct MlpClassifier {
    layers: Vec<Linear>,
    input_width: usize,
    category_count: usize,
    device: Device,
}

impl MlpClassifier {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound {
                kind: KIND,
                path: path.to_path_buf(),
            });
        }
        let size = std::fs::metadata(path)
            .map_err(|source| ArtifactError::Io {
                kind: KIND,
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if size < MIN_MODEL_BYTES {
            warn!(
                "Model file is very small ({size} bytes). It may be corrupted: {}",
                path.display()
            );
        }

        let device = Device::Cpu;
        let invalid = |reason: String| ArtifactError::Invalid {
            kind: KIND,
            path: path.to_path_buf(),
            reason,
        };
        let tensors = candle_core::safetensors::load(path, &device)
            .map_err(|e| invalid(e.to_string()))?;
        Self::from_tensors(tensors, device).map_err(invalid)
    }

    fn from_tensors(mut tensors: HashMap<String, Tensor>, device: Device) -> Result<Self, String> {
        let mut layers = Vec::new();
        let mut input_width = 0;
        let mut previous_out: Option<usize> = None;

        for i in 0.. {
            let Some(weight) = tensors.remove(&format!("dense_{i}.weight")) else {
                break;
            };
            let bias = tensors
                .remove(&format!("dense_{i}.bias"))
                .ok_or_else(|| format!("dense_{i}.bias is missing"))?;

            let (out_dim, in_dim) = weight
                .dims2()
                .map_err(|e| format!("dense_{i}.weight: {e}"))?;
            let bias_dim = bias.dims1().map_err(|e| format!("dense_{i}.bias: {e}"))?;
            if bias_dim != out_dim {
                return Err(format!(
                    "dense_{i}.bias has {bias_dim} values, expected {out_dim}"
                ));
            }
            match previous_out {
                None => input_width = in_dim,
                Some(prev) if prev != in_dim => {
                    return Err(format!(
                        "dense_{i} expects {in_dim} inputs but the previous layer produces {prev}"
                    ));
                }
                Some(_) => {}
            }
            previous_out = Some(out_dim);

            let weight = weight.to_dtype(DType::F32).map_err(|e| e.to_string())?;
            let bias = bias.to_dtype(DType::F32).map_err(|e| e.to_string())?;
            layers.push(Linear::new(weight, Some(bias)));
        }

        let category_count = previous_out.ok_or("no dense_0.weight tensor found")?;
        Ok(Self {
            layers,
            input_width,
            category_count,
            device,
        })
    }
}

impl CategoryScorer for MlpClassifier {
    fn input_width(&self) -> usize {
        self.input_width
    }

    fn category_count(&self) -> usize {
        self.category_count
    }

    fn score(&self, features: &FeatureVector) -> Result<Vec<f32>, ScoreError> {
        if features.len() != self.input_width {
            return Err(ScoreError::InputWidth {
                expected: self.input_width,
                actual: features.len(),
            });
        }

        let mut x = Tensor::from_slice(features.as_slice(), (1, self.input_width), &self.device)?;
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(&x)?;
            if i < last {
                x = x.relu()?;
            }
        }
        let probabilities = candle_nn::ops::softmax(&x, D::Minus1)?;
        Ok(probabilities.squeeze(0)?.to_vec1::<f32>()?)
    }
}
