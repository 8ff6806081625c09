use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

/// A single course suggestion. Every field may be empty.
///
/// Deserialization is lenient because the record comes from free-form LLM output:
/// common key spellings are accepted, missing keys become `""` and non-string
/// values are stringified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        alias = "courseName",
        alias = "course name",
        alias = "Course Name",
        alias = "name",
        alias = "title"
    )]
    pub course_name: String,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        alias = "Provider",
        alias = "platform"
    )]
    pub provider: String,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        alias = "Description"
    )]
    pub description: String,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        alias = "URL",
        alias = "link"
    )]
    pub url: String,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        alias = "Relevance",
        alias = "why_relevant"
    )]
    pub relevance: String,
}

impl CourseRecord {
    /// Returned without any network call when no credential is configured.
    pub fn api_key_missing() -> Self {
        Self {
            course_name: "API Key Missing".to_string(),
            provider: "N/A".to_string(),
            description: "No Gemini API key provided in environment variables.".to_string(),
            url: String::new(),
            relevance: "Please set the GEMINI_API_KEY environment variable.".to_string(),
        }
    }

    /// The API answered with a non-200 status.
    pub fn api_error(status: u16, detail: &str) -> Self {
        Self {
            course_name: "API Error".to_string(),
            provider: "N/A".to_string(),
            description: format!("Error calling Gemini API: {status} - {detail}"),
            url: String::new(),
            relevance: "Please check your API key and network connection.".to_string(),
        }
    }

    /// Transport failure or a response that could not be interpreted.
    pub fn exception(error: impl Display) -> Self {
        Self {
            course_name: "Exception".to_string(),
            provider: "N/A".to_string(),
            description: format!("Exception when calling Gemini API: {error}"),
            url: String::new(),
            relevance: "Please check your network connection.".to_string(),
        }
    }

    /// Generic course offered in keyword mode, where no API is consulted.
    pub fn fundamentals(job_title: &str) -> Self {
        Self {
            course_name: format!("{job_title} Fundamentals"),
            provider: "Coursera".to_string(),
            description: format!("Comprehensive training for {job_title} roles"),
            url: "https://www.coursera.org".to_string(),
            relevance: "Core professional skills".to_string(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
