use std::path::Path;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::recommendation::models::PipelineResult;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

/// POST /api/v1/recommendations
///
/// Expects a multipart body with one file field named `resume`. Pipeline failures
/// (unsupported format, unreadable file, ...) are still a 200 carrying `{"error": ...}`.
pub async fn handle_recommend(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PipelineResult>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        info!("Received resume upload '{file_name}' ({} bytes)", bytes.len());

        // The extractor dispatches on extension, so the temp file keeps it.
        let mut builder = tempfile::Builder::new();
        builder.prefix("resume-");
        let suffix = Path::new(&file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()));
        if let Some(suffix) = &suffix {
            builder.suffix(suffix);
        }
        let upload = builder
            .tempfile()
            .context("Failed to create temporary upload file")?;
        tokio::fs::write(upload.path(), &bytes)
            .await
            .context("Failed to write temporary upload file")?;

        let result = state.pipeline.process(upload.path()).await;
        return Ok(Json(result));
    }

    Err(AppError::Validation(format!(
        "Missing multipart file field '{RESUME_FIELD}'"
    )))
}
