pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers;
use crate::state::AppState;

/// Uploads above this size are rejected before the handler runs.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/recommendations",
            post(handlers::handle_recommend).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::courses::CourseAdvisor;
    use crate::model::ModelContext;
    use crate::recommendation::pipeline::Pipeline;
    use crate::test_support::{write_classifier, write_docx, write_vectorizer};

    const BOUNDARY: &str = "X-RECOMMENDER-BOUNDARY";

    fn app(dir: &std::path::Path) -> Router {
        let model = dir.join("classifier.safetensors");
        let vectorizer = dir.join("vectorizer.json");
        let mapping = dir.join("job_titles.json");
        write_classifier(&model);
        write_vectorizer(&vectorizer);
        std::fs::write(
            &mapping,
            r#"{"0": "Data Scientist", "1": "DevOps Engineer", "2": "UX Designer"}"#,
        )
        .unwrap();

        let models = ModelContext::load(&model, &vectorizer, &mapping).unwrap();
        let pipeline = Pipeline::new(models, CourseAdvisor::new(None), 2);
        build_router(AppState {
            pipeline: Arc::new(pipeline),
        })
    }

    fn multipart_request(field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/recommendations")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "recommender");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_docx_upload_returns_recommendations() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("upload.docx");
        write_docx(&resume, &["Python", "SQL"]);
        let content = std::fs::read(&resume).unwrap();

        let response = app(dir.path())
            .oneshot(multipart_request("resume", "Jane_Doe.DOCX", &content))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let recommendations = body["recommendations"].as_array().unwrap();
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0]["job_title"], "Data Scientist");
        assert_eq!(
            recommendations[0]["training_courses"][0]["course_name"],
            "API Key Missing"
        );
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_error_body_not_status() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(multipart_request("resume", "resume.txt", b"plain text"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("Unsupported"));
        assert!(body.get("recommendations").is_none());
    }

    #[tokio::test]
    async fn test_missing_resume_field_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(multipart_request("attachment", "resume.pdf", b"%PDF-1.4"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
