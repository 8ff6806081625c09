use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Classifier output index → display label.
///
/// Lookups never fail: indices without an entry resolve to `"Job Category {i+1}"`,
/// which also guards against a mapping file that is shorter than the model output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMapping {
    labels: HashMap<usize, String>,
}

impl CategoryMapping {
    pub fn synthesized(count: usize) -> Self {
        Self {
            labels: (0..count).map(|i| (i, default_label(i))).collect(),
        }
    }

    /// Labels in index order.
    pub fn from_labels(labels: impl IntoIterator<Item = String>) -> Self {
        Self {
            labels: labels.into_iter().enumerate().collect(),
        }
    }

    /// Parses a JSON object such as `{"0": "Data Scientist", "1": "DevOps Engineer"}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, String> =
            serde_json::from_str(raw).context("job mapping must be a JSON object of strings")?;
        let labels = parsed
            .into_iter()
            .map(|(key, label)| {
                key.trim()
                    .parse::<usize>()
                    .map(|index| (index, label))
                    .with_context(|| format!("job mapping key '{key}' is not an index"))
            })
            .collect::<Result<_>>()?;
        Ok(Self { labels })
    }

    /// Reads the mapping file; falls back to synthesized labels when it is absent or invalid.
    pub fn load_or_synthesize(path: &Path, category_count: usize) -> Self {
        if !path.exists() {
            info!(
                "Job mapping file not found at {}. Using default labels.",
                path.display()
            );
            return Self::synthesized(category_count);
        }

        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .and_then(|raw| Self::from_json(&raw));
        match loaded {
            Ok(mapping) => {
                info!("Job titles mapping loaded from {}", path.display());
                mapping
            }
            Err(e) => {
                warn!("Error loading job titles: {e:#}. Using default labels.");
                Self::synthesized(category_count)
            }
        }
    }

    pub fn label(&self, index: usize) -> String {
        self.labels
            .get(&index)
            .cloned()
            .unwrap_or_else(|| default_label(index))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn default_label(index: usize) -> String {
    format!("Job Category {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_labels_are_one_based() {
        let mapping = CategoryMapping::synthesized(3);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.label(0), "Job Category 1");
        assert_eq!(mapping.label(2), "Job Category 3");
    }

    #[test]
    fn test_from_json_parses_string_indices() {
        let mapping =
            CategoryMapping::from_json(r#"{"0": "Data Scientist", "1": "Software Engineer"}"#)
                .unwrap();
        assert_eq!(mapping.label(0), "Data Scientist");
        assert_eq!(mapping.label(1), "Software Engineer");
    }

    #[test]
    fn test_from_labels_indexes_in_order() {
        let mapping = CategoryMapping::from_labels([
            "UX Designer".to_string(),
            "DevOps Engineer".to_string(),
        ]);
        assert_eq!(mapping.label(0), "UX Designer");
        assert_eq!(mapping.label(1), "DevOps Engineer");
        assert_eq!(mapping.label(2), "Job Category 3");
    }

    #[test]
    fn test_unknown_index_falls_back_to_synthesized_label() {
        let mapping = CategoryMapping::from_json(r#"{"0": "Data Scientist"}"#).unwrap();
        assert_eq!(mapping.label(4), "Job Category 5");
    }

    #[test]
    fn test_non_numeric_key_is_rejected() {
        assert!(CategoryMapping::from_json(r#"{"first": "Data Scientist"}"#).is_err());
        assert!(CategoryMapping::from_json(r#"["Data Scientist"]"#).is_err());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job_titles.json");
        std::fs::write(&path, "{broken").unwrap();

        let mapping = CategoryMapping::load_or_synthesize(&path, 2);
        assert_eq!(mapping, CategoryMapping::synthesized(2));
    }

    #[test]
    fn test_file_is_loaded_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job_titles.json");
        std::fs::write(&path, r#"{"0": "UX Designer", "1": "DevOps Engineer"}"#).unwrap();

        let mapping = CategoryMapping::load_or_synthesize(&path, 5);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.label(1), "DevOps Engineer");
    }
}
