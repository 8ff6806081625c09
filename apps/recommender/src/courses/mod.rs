//! Course enrichment: asks the generative API for training courses that would help
//! a candidate qualify for a job, and turns the answer into [`CourseRecord`]s.
//!
//! Failures never propagate. A missing credential, an HTTP error or a transport
//! fault each come back as a single sentinel record. In keyword mode the advisor
//! skips the API and offers one templated course per job.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm_client::{LlmError, TextGenerator};

pub mod models;
pub mod parser;
pub mod prompts;

pub use models::CourseRecord;

#[derive(Clone)]
pub struct CourseAdvisor {
    source: CourseSource,
}

#[derive(Clone)]
enum CourseSource {
    Generated(Option<Arc<dyn TextGenerator>>),
    Templated,
}

impl CourseAdvisor {
    /// `None` means no credential is configured; every call then returns the
    /// "API Key Missing" sentinel without touching the network.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            source: CourseSource::Generated(generator),
        }
    }

    /// Offers [`CourseRecord::fundamentals`] for every job and never calls the API.
    pub fn templated() -> Self {
        Self {
            source: CourseSource::Templated,
        }
    }

    /// At most three courses for `job_title`, using the resume as context.
    /// Makes exactly one API call, or none when no credential is configured.
    pub async fn enrich(&self, job_title: &str, resume_text: &str) -> Vec<CourseRecord> {
        let generator = match &self.source {
            CourseSource::Templated => return vec![CourseRecord::fundamentals(job_title)],
            CourseSource::Generated(None) => return vec![CourseRecord::api_key_missing()],
            CourseSource::Generated(Some(generator)) => generator,
        };

        let prompt = prompts::course_prompt(job_title, resume_text);
        match generator.generate(&prompt).await {
            Ok(text) => {
                let courses = parser::parse_course_response(&text);
                debug!("Parsed {} courses for '{job_title}'", courses.len());
                courses
            }
            Err(LlmError::Api { status, message }) => {
                warn!("Course lookup for '{job_title}' failed with status {status}: {message}");
                vec![CourseRecord::api_error(status, &message)]
            }
            Err(e) => {
                warn!("Course lookup for '{job_title}' failed: {e}");
                vec![CourseRecord::exception(e)]
            }
        }
    }
}
