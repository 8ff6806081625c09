//! End-to-end resume processing: extract → encode → score → rank → enrich.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::courses::CourseAdvisor;
use crate::extract::{extract_text, AcceptedFormats, ExtractError};
use crate::model::{ModelContext, ScoreError};
use crate::recommendation::models::{JobRecommendation, PipelineResult};
use crate::recommendation::ranker::rank;

pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Error during prediction: {0}")]
    Score(#[from] ScoreError),

    #[error("Prediction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct Pipeline {
    models: Arc<ModelContext>,
    advisor: CourseAdvisor,
    accepted: AcceptedFormats,
    top_n: usize,
}

impl Pipeline {
    /// Reads `.pdf` and `.docx` resumes.
    pub fn new(models: ModelContext, advisor: CourseAdvisor, top_n: usize) -> Self {
        Self {
            models: Arc::new(models),
            advisor,
            accepted: AcceptedFormats::Documents,
            top_n,
        }
    }

    /// Keyword scoring with templated courses. Needs no artifacts or credential and
    /// also reads `.txt` resumes.
    pub fn keyword_fallback(top_n: usize) -> Self {
        Self {
            models: Arc::new(ModelContext::keyword_fallback()),
            advisor: CourseAdvisor::templated(),
            accepted: AcceptedFormats::DocumentsAndText,
            top_n,
        }
    }

    /// Never fails: every error is folded into [`PipelineResult::Failure`].
    pub async fn process(&self, path: &Path) -> PipelineResult {
        self.process_with_top_n(path, self.top_n).await
    }

    pub async fn process_with_top_n(&self, path: &Path, top_n: usize) -> PipelineResult {
        match self.run(path, top_n).await {
            Ok(result) => result,
            Err(e) => {
                error!("Failed to process {}: {e}", path.display());
                PipelineResult::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn run(&self, path: &Path, top_n: usize) -> Result<PipelineResult, PipelineError> {
        let models = Arc::clone(&self.models);
        let accepted = self.accepted;
        let owned_path = path.to_path_buf();

        // Parsing and inference are CPU-bound; keep them off the async executor.
        let (resume_text, ranked, degraded) =
            tokio::task::spawn_blocking(move || -> Result<_, PipelineError> {
                let resume_text = extract_text(&owned_path, accepted)?;
                let encoded = models.encode(&resume_text);
                let scores = models.score(&encoded.features)?;
                let mut ranked = rank(&scores, top_n, models.mapping());
                for job in &mut ranked {
                    job.confidence = models.calibrate(job.confidence);
                }
                Ok((resume_text, ranked, encoded.degraded))
            })
            .await??;

        info!(
            "Ranked {} job categories for {}",
            ranked.len(),
            path.display()
        );

        // One enrichment call per job, strictly in order.
        let mut recommendations = Vec::with_capacity(ranked.len());
        for job in ranked {
            let training_courses = self.advisor.enrich(&job.job_title, &resume_text).await;
            recommendations.push(JobRecommendation {
                job_title: job.job_title,
                confidence: job.confidence,
                training_courses,
            });
        }

        Ok(PipelineResult::Success {
            recommendations,
            degraded_features: degraded,
        })
    }
}
