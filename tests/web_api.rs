// HTTP API tests: drive the router with tower's oneshot against stub
// feature builders and classifiers.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use common::*;
use dupecheck::checker::DuplicateChecker;

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_check(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/check")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ============================================================
// POST /api/check
// ============================================================

#[tokio::test]
async fn check_returns_prediction_for_valid_pair() {
    let response = app(loaded_checker())
        .oneshot(post_check(
            r#"{"q1":"How to learn Python?","q2":"How do I learn Python?"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["q1"], "How to learn Python?");
    assert_eq!(json["q2"], "How do I learn Python?");
    assert!(json["is_duplicate"].is_boolean());

    let not_dup = json["probability_not_duplicate"].as_f64().unwrap();
    let dup = json["probability_duplicate"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&not_dup));
    assert!((0.0..=1.0).contains(&dup));
    assert!((not_dup + dup - 1.0).abs() < 1e-6, "sum was {}", not_dup + dup);
}

#[tokio::test]
async fn check_echoes_trimmed_questions() {
    let response = app(loaded_checker())
        .oneshot(post_check(r#"{"q1":"  abc  ","q2":"\tabcdef\n"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["q1"], "abc");
    assert_eq!(json["q2"], "abcdef");
    // Length features 3 and 6 -> duplicate weight 6/9
    let dup = json["probability_duplicate"].as_f64().unwrap();
    assert!((dup - 6.0 / 9.0).abs() < 1e-6);
    assert_eq!(json["is_duplicate"], true);
}

#[tokio::test]
async fn missing_q2_is_bad_request() {
    let response = app(loaded_checker())
        .oneshot(post_check(r#"{"q1":"How to learn Python?"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Both q1 and q2 are required");
}

#[tokio::test]
async fn missing_q1_is_bad_request() {
    let response = app(loaded_checker())
        .oneshot(post_check(r#"{"q2":"How to learn Python?"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn blank_question_is_bad_request() {
    let response = app(loaded_checker())
        .oneshot(post_check(r#"{"q1":"   ","q2":"How to learn Python?"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_json_body_is_bad_request() {
    let response = app(loaded_checker())
        .oneshot(post_check("q1=hello&q2=world"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No JSON data provided");
}

#[tokio::test]
async fn empty_body_is_bad_request() {
    let response = app(loaded_checker()).oneshot(post_check("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No JSON data provided");
}

#[tokio::test]
async fn non_string_fields_are_bad_request() {
    let response = app(loaded_checker())
        .oneshot(post_check(r#"{"q1":42,"q2":"How to learn Python?"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unloaded_model_is_server_error() {
    let checker = DuplicateChecker::new(Some(Arc::new(LengthFeatures)), None);
    let response = app(checker)
        .oneshot(post_check(
            r#"{"q1":"How to learn Python?","q2":"How do I learn Python?"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Model not loaded");
}

#[tokio::test]
async fn nothing_loaded_reports_model_first() {
    let response = app(DuplicateChecker::new(None, None))
        .oneshot(post_check(r#"{"q1":"a","q2":"b"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Model not loaded");
}

#[tokio::test]
async fn unloaded_feature_builder_is_server_error() {
    let checker = DuplicateChecker::new(None, Some(Arc::new(RatioClassifier)));
    let response = app(checker)
        .oneshot(post_check(r#"{"q1":"a","q2":"b"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Feature builder not loaded");
}

#[tokio::test]
async fn inference_error_is_reported_with_message() {
    let checker = DuplicateChecker::new(
        Some(Arc::new(LengthFeatures)),
        Some(Arc::new(FailingClassifier)),
    );
    let response = app(checker)
        .oneshot(post_check(r#"{"q1":"a","q2":"b"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "inference exploded");
}

#[tokio::test]
async fn handler_panic_becomes_server_error() {
    let checker = DuplicateChecker::new(
        Some(Arc::new(PanickingFeatures)),
        Some(Arc::new(RatioClassifier)),
    );
    let response = app(checker)
        .oneshot(post_check(r#"{"q1":"a","q2":"b"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "tokenizer blew up");
}

#[tokio::test]
async fn check_rejects_get() {
    let response = app(loaded_checker()).oneshot(get("/api/check")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================
// GET /api/health
// ============================================================

#[tokio::test]
async fn health_reports_loaded_components() {
    let response = app(loaded_checker()).oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["helper_loaded"], true);
}

#[tokio::test]
async fn health_reports_each_component_independently() {
    let checker = DuplicateChecker::new(None, Some(Arc::new(RatioClassifier)));
    let json = body_json(app(checker).oneshot(get("/api/health")).await.unwrap()).await;
    assert_eq!(json["model_loaded"], true);
    assert_eq!(json["helper_loaded"], false);

    let checker = DuplicateChecker::new(Some(Arc::new(LengthFeatures)), None);
    let json = body_json(app(checker).oneshot(get("/api/health")).await.unwrap()).await;
    assert_eq!(json["model_loaded"], false);
    assert_eq!(json["helper_loaded"], true);
}

// ============================================================
// GET / and GET /api/test
// ============================================================

#[tokio::test]
async fn home_serves_index_html_when_present() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Duplicate checker</h1>").unwrap();

    let response = app_with(loaded_checker(), test_config(dir.path().to_path_buf(), false))
        .oneshot(get("/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "got {content_type}");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>Duplicate checker</h1>");
}

#[tokio::test]
async fn home_falls_back_to_descriptor() {
    let response = app(loaded_checker()).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "dupecheck");
    assert!(json["endpoints"].as_array().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn diagnostics_hidden_without_debug() {
    let response = app(loaded_checker()).oneshot(get("/api/test")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn diagnostics_available_in_debug() {
    let dir = tempfile::tempdir().unwrap();
    let response = app_with(loaded_checker(), test_config(dir.path().to_path_buf(), true))
        .oneshot(get("/api/test"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["model_exists"], false);
    assert_eq!(json["model_url_set"], false);
    assert_eq!(json["model_loaded"], true);
}
