//! Analyze API integration tests.
//!
//! Run with: `cargo test -p modgate-api --test analyze_test`
//! All remote collaborators are mocked; no database or ffmpeg needed.

mod helpers;

use std::sync::Arc;

use helpers::{multipart_body, multipart_content_type, setup_test_app};
use modgate_services::test_helpers::MockJudge;
use serde_json::{json, Value};

const BOUNDARY: &str = "------------------------modgate-test";

#[tokio::test]
async fn oversized_audio_gets_graceful_result_not_transport_error() {
    let judge = Arc::new(MockJudge::replying("0.9"));
    let app = setup_test_app(judge.clone());

    // 30 MiB declared as MP3, over the 25 MiB audio gate.
    let body = multipart_body(
        BOUNDARY,
        "big.mp3",
        &vec![0u8; 30 * 1024 * 1024],
        Some("user-1"),
    );
    let response = app
        .client()
        .post("/api/v0/analyze/audio")
        .add_header("content-type", multipart_content_type(BOUNDARY))
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 200);
    let payload: Value = response.json();
    assert_eq!(payload["score_state"], "unavailable");
    assert_eq!(payload["toxicity_score"].as_f64().unwrap(), 0.5);
    assert!(payload["transcription"]
        .as_str()
        .unwrap()
        .contains("too large for analysis"));
    assert_eq!(payload["violation_recorded"], false);
    // The size gate fired before any remote call.
    assert_eq!(judge.call_count(), 0);
    assert!(app.violations.recorded().is_empty());
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let judge = Arc::new(MockJudge::replying("0.0"));
    let app = setup_test_app(judge);

    let body = format!("--{BOUNDARY}--\r\n").into_bytes();
    let response = app
        .client()
        .post("/api/v0/analyze/audio")
        .add_header("content-type", multipart_content_type(BOUNDARY))
        .bytes(body.into())
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn toxic_text_records_a_violation() {
    let judge = Arc::new(MockJudge::replying("0.9"));
    let app = setup_test_app(judge);

    let response = app
        .client()
        .post("/api/v0/analyze/text")
        .json(&json!({"text": "some unpleasant words", "user_id": "user-2"}))
        .await;

    assert_eq!(response.status_code(), 200);
    let payload: Value = response.json();
    assert_eq!(payload["score_state"], "computed");
    assert!((payload["toxicity_score"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert_eq!(payload["violation_recorded"], true);

    let recorded = app.violations.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].user_id, "user-2");
}
