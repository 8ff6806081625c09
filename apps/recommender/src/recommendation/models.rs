use serde::Serialize;

use crate::courses::CourseRecord;

/// A ranked job category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub job_title: String,
    pub confidence: f32,
}

/// A recommendation with its course suggestions attached.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecommendation {
    pub job_title: String,
    pub confidence: f32,
    pub training_courses: Vec<CourseRecord>,
}

/// Outcome of one pipeline run. Serializes to either
/// `{"recommendations": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PipelineResult {
    Success {
        recommendations: Vec<JobRecommendation>,
        /// Set when the features were zeroed after an encoder fault.
        #[serde(skip_serializing_if = "is_false")]
        degraded_features: bool,
    },
    Failure {
        error: String,
    },
}

impl PipelineResult {
    pub fn is_error(&self) -> bool {
        matches!(self, PipelineResult::Failure { .. })
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
