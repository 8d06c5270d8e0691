pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::resume::handlers as resume_handlers;
use crate::state::AppState;

/// Room for multipart framing and the text fields around the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis/skills", post(handlers::handle_extract_skills))
        .route("/api/v1/analysis/ats-score", post(handlers::handle_ats_score))
        .route("/api/v1/analysis/match", post(handlers::handle_match))
        .route("/api/v1/analysis/rank", post(handlers::handle_rank))
        .route("/api/v1/analysis/feedback", post(handlers::handle_feedback))
        // Resume API
        .route("/api/v1/resumes/analyze", post(resume_handlers::handle_analyze))
        .route("/api/v1/resumes/upload", post(resume_handlers::handle_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::ats_scorer::ScoringThresholds;
    use crate::analysis::vocabulary::SkillVocabulary;
    use crate::analysis::Analyzer;
    use crate::config::Config;
    use crate::feedback::FeedbackGenerator;

    fn test_state() -> AppState {
        let vocabulary = Arc::new(SkillVocabulary::standard().unwrap());
        AppState {
            config: Config::default(),
            analyzer: Arc::new(Analyzer::new(vocabulary, ScoringThresholds::default()).unwrap()),
            feedback: Arc::new(FeedbackGenerator::template_only()),
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["feedback_provider"], "template");
    }

    #[tokio::test]
    async fn test_skills_endpoint_returns_sorted_sets() {
        let (status, body) = send(post_json(
            "/api/v1/analysis/skills",
            json!({"text": "Python, Docker and teamwork"}),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["all"], json!(["Docker", "Python", "Teamwork"]));
        assert_eq!(body["technical"], json!(["Docker", "Python"]));
        assert_eq!(body["soft"], json!(["Teamwork"]));
    }

    #[tokio::test]
    async fn test_blank_resume_is_validation_error() {
        let (status, body) = send(post_json(
            "/api/v1/analysis/ats-score",
            json!({"resume_text": "   "}),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_null_text_is_rejected_by_extractor() {
        let (status, _) = send(post_json("/api/v1/analysis/skills", json!({"text": null}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_match_scenario() {
        let (status, body) = send(post_json(
            "/api/v1/analysis/match",
            json!({
                "resume_text": "Python developer building APIs with FastAPI",
                "job_description": "Looking for Python engineer with FastAPI and AWS"
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["result"]["match_percentage"].as_f64().unwrap() > 50.0);
        assert_eq!(body["result"]["missing_skills"], json!(["AWS"]));
        assert!(body["interpretation"].is_string());
    }

    #[tokio::test]
    async fn test_rank_rejects_empty_list() {
        let (status, _) = send(post_json(
            "/api/v1/analysis/rank",
            json!({"resumes": [], "job_description": "Rust"}),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rank_orders_best_first() {
        let (status, body) = send(post_json(
            "/api/v1/analysis/rank",
            json!({
                "resumes": ["Java and Spring developer", "Rust and Kubernetes engineer"],
                "job_description": "Rust engineer with Kubernetes"
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rankings"][0]["index"], 1);
        assert_eq!(body["rankings"][1]["index"], 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_rank_keeps_runtime_responsive() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    ticks.fetch_add(1, Ordering::Relaxed);
                }
            })
        };

        let resume = "Rust engineer shipping Kubernetes operators on AWS. ".repeat(160);
        let resumes = vec![resume; handlers::MAX_RANKED_RESUMES];
        let request = post_json(
            "/api/v1/analysis/rank",
            json!({
                "resumes": resumes,
                "job_description": "Rust, Kubernetes, AWS, Terraform"
            }),
        );
        let router = build_router(test_state());

        // Runs on the single worker so a blocked handler would starve the ticker.
        let (status, ticks_during_request) = tokio::spawn({
            let ticks = Arc::clone(&ticks);
            async move {
                let before = ticks.load(Ordering::Relaxed);
                let response = router.oneshot(request).await.unwrap();
                (response.status(), ticks.load(Ordering::Relaxed) - before)
            }
        })
        .await
        .unwrap();
        ticker.abort();

        assert_eq!(status, StatusCode::OK);
        assert!(ticks_during_request > 0);
    }

    #[tokio::test]
    async fn test_feedback_endpoint_uses_template() {
        let (status, body) = send(post_json(
            "/api/v1/analysis/feedback",
            json!({
                "resume_text": "Python developer building APIs with FastAPI",
                "job_description": "Python, FastAPI, AWS"
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "template");
        assert!(body["feedback"].as_str().unwrap().contains("AWS"));
    }

    #[tokio::test]
    async fn test_analyze_runs_full_pipeline() {
        let (status, body) = send(post_json(
            "/api/v1/resumes/analyze",
            json!({
                "resume_text": "Python developer building APIs with FastAPI",
                "job_description": "Python, FastAPI, AWS",
                "include_feedback": true
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["analysis_id"].is_string());
        assert!(body["ats"]["total"].is_number());
        assert_eq!(body["match"]["missing_skills"], json!(["AWS"]));
        assert_eq!(body["feedback"]["source"], "template");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let boundary = "X-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"resume.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Python developer\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Only PDF files are supported");
    }

    #[tokio::test]
    async fn test_upload_without_filename_checks_content_type() {
        let boundary = "X-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Python developer\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Only PDF files are supported");
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let boundary = "X-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"job_description\"\r\n\r\n\
             Rust engineer\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
