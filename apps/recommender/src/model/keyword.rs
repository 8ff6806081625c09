//! Keyword mode: a model-free stand-in for the trained encoder and classifier.
//!
//! [`KeywordEncoder`] counts keyword occurrences per job category, so each feature
//! column is one category. [`KeywordScorer`] passes those counts through unchanged as
//! ranking scores and calibrates them into a confidence of `0.5 + count / 10`,
//! clamped to `[0.5, 0.95]` and rounded to two decimals.

use super::{
    CategoryMapping, CategoryScorer, EncodeError, FeatureEncoder, FeatureVector, ScoreError,
};

/// Job categories in index order with the terms counted for each.
pub const KEYWORD_CATEGORIES: [(&str, &[&str]); 5] = [
    (
        "Data Scientist",
        &[
            "data science",
            "machine learning",
            "python",
            "statistics",
            "analytics",
            "data analysis",
            "pandas",
            "numpy",
            "sklearn",
        ],
    ),
    (
        "Software Engineer",
        &[
            "software",
            "programming",
            "development",
            "java",
            "python",
            "javascript",
            "code",
            "algorithm",
            "api",
        ],
    ),
    (
        "Product Manager",
        &[
            "product",
            "management",
            "strategy",
            "roadmap",
            "agile",
            "scrum",
            "user experience",
            "prioritization",
        ],
    ),
    (
        "UX Designer",
        &[
            "design",
            "user experience",
            "ux",
            "ui",
            "wireframe",
            "prototype",
            "usability",
            "sketch",
            "figma",
        ],
    ),
    (
        "DevOps Engineer",
        &[
            "devops",
            "ci/cd",
            "pipeline",
            "aws",
            "cloud",
            "docker",
            "kubernetes",
            "infrastructure",
        ],
    ),
];

const MIN_CONFIDENCE: f32 = 0.5;
const MAX_CONFIDENCE: f32 = 0.95;

pub fn keyword_mapping() -> CategoryMapping {
    CategoryMapping::from_labels(KEYWORD_CATEGORIES.iter().map(|(label, _)| label.to_string()))
}

/// Substring counts, so "api" also matches inside "capital". Occurrences of one term
/// do not overlap.
pub struct KeywordEncoder;

impl FeatureEncoder for KeywordEncoder {
    fn dimension(&self) -> usize {
        KEYWORD_CATEGORIES.len()
    }

    fn transform(&self, text: &str) -> Result<FeatureVector, EncodeError> {
        let text = text.to_lowercase();
        let counts = KEYWORD_CATEGORIES
            .iter()
            .map(|(_, terms)| {
                terms
                    .iter()
                    .map(|term| text.matches(term).count())
                    .sum::<usize>() as f32
            })
            .collect();
        Ok(FeatureVector::new(counts))
    }
}

pub struct KeywordScorer;

impl CategoryScorer for KeywordScorer {
    fn input_width(&self) -> usize {
        KEYWORD_CATEGORIES.len()
    }

    fn category_count(&self) -> usize {
        KEYWORD_CATEGORIES.len()
    }

    fn score(&self, features: &FeatureVector) -> Result<Vec<f32>, ScoreError> {
        if features.len() != self.input_width() {
            return Err(ScoreError::InputWidth {
                expected: self.input_width(),
                actual: features.len(),
            });
        }
        Ok(features.as_slice().to_vec())
    }

    fn calibrate(&self, score: f32) -> f32 {
        let confidence = (MIN_CONFIDENCE + score / 10.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
        (confidence * 100.0).round() / 100.0
    }
}
