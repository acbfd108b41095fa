//! Test helpers: build AppState and router for integration tests.
//!
//! Every remote collaborator is mocked, so the tests need no network,
//! no database, and no ffmpeg on the PATH.

use std::sync::Arc;

use axum_test::TestServer;

use modgate_api::setup::routes::setup_routes;
use modgate_api::state::AppState;
use modgate_core::{Config, ThresholdStore};
use modgate_services::test_helpers::{
    pipeline_with_judge, MockJudge, MockViolationRepository,
};
use modgate_services::{ChatJudge, TextToxicityScorer, ViolationGate};

/// Test application: server plus the in-memory violation store.
pub struct TestApp {
    pub server: TestServer,
    pub violations: MockViolationRepository,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        database_url: String::new(),
        db_max_connections: 1,
        openai_api_key: "test-key".to_string(),
        openai_api_base: "http://localhost:9/v1".to_string(),
        openai_chat_model: "gpt-4o".to_string(),
        openai_transcribe_model: "whisper-1".to_string(),
        translate_url: None,
        translate_target: "en".to_string(),
        classifier_url: None,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        max_audio_bytes: 25 * 1024 * 1024,
        max_image_bytes: 20 * 1024 * 1024,
        segment_seconds: 300,
        default_threshold: 0.85,
        admin_api_key: Some("test-admin-key".to_string()),
        stream_max_buffer_bytes: 50 * 1024 * 1024,
        stream_idle_timeout_secs: 120,
    }
}

/// Wire the full router over mock services sharing one judge.
pub fn setup_test_app(judge: Arc<MockJudge>) -> TestApp {
    let config = test_config();
    let violations = MockViolationRepository::new();
    let threshold = Arc::new(ThresholdStore::new(config.default_threshold));

    let pipeline = pipeline_with_judge(judge.clone(), None);
    let text_scorer = Arc::new(TextToxicityScorer::new(
        judge as Arc<dyn ChatJudge>,
        None,
        None,
        "en".to_string(),
    ));
    let gate = ViolationGate::new(Arc::new(violations.clone()), threshold.clone());

    let state = Arc::new(AppState {
        config: config.clone(),
        pipeline,
        text_scorer,
        gate,
        violations: Arc::new(violations.clone()),
        threshold,
    });

    let router = setup_routes(&config, state).expect("router setup");
    TestApp {
        server: TestServer::new(router).expect("test server"),
        violations,
    }
}

/// Raw multipart body with a `file` part and an optional `user_id` part.
pub fn multipart_body(
    boundary: &str,
    filename: &str,
    data: &[u8],
    user_id: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    if let Some(user_id) = user_id {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"user_id\"\r\n\r\n{user_id}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type(boundary: &str) -> String {
    format!("multipart/form-data; boundary={boundary}")
}
