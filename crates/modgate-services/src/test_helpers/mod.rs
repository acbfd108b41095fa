//! Mock service implementations for testing.
//!
//! These mocks allow exercising the moderation pipeline without network
//! access, a database, or ffmpeg on the PATH.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use modgate_core::models::Violation;
use modgate_core::AppError;
use modgate_db::ViolationRepository;
use modgate_processing::audio::AudioNormalizer;
use modgate_processing::video::FrameSampler;

use crate::moderation::pipeline::ModalityPipeline;
use crate::moderation::text::TextToxicityScorer;
use crate::moderation::transcriber::Transcriber;
use crate::moderation::visual::{VideoAnalyzer, VisualToxicityScorer};
use crate::services::{ChatJudge, SpeechToText, TextClassifier, TranslationProvider};

/// Chat judge that always answers with a fixed reply, or always fails.
/// Counts calls so tests can assert a remote call was (not) attempted.
pub struct MockJudge {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl MockJudge {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| anyhow!("mock judge unavailable"))
    }
}

#[async_trait]
impl ChatJudge for MockJudge {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        self.answer()
    }

    async fn complete_with_images(
        &self,
        _system: &str,
        _user: &str,
        _images: &[Vec<u8>],
    ) -> Result<String> {
        self.answer()
    }
}

/// Classifier returning a fixed score and label.
pub struct MockClassifier {
    score: f32,
    label: String,
    fail: bool,
}

impl MockClassifier {
    pub fn new(score: f32, label: &str) -> Self {
        Self {
            score,
            label: label.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            score: 0.0,
            label: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl TextClassifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<(f32, String)> {
        if self.fail {
            return Err(anyhow!("mock classifier unavailable"));
        }
        Ok((self.score, self.label.clone()))
    }
}

/// Translator returning a fixed translation regardless of input.
pub struct MockTranslator {
    translation: Option<String>,
}

impl MockTranslator {
    pub fn to(translation: &str) -> Self {
        Self {
            translation: Some(translation.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { translation: None }
    }
}

#[async_trait]
impl TranslationProvider for MockTranslator {
    async fn translate(&self, _text: &str, _target: &str) -> Result<String> {
        self.translation
            .clone()
            .ok_or_else(|| anyhow!("mock translator unavailable"))
    }
}

/// Speech-to-text stub returning a fixed transcript.
pub struct MockSpeechToText {
    transcript: String,
}

impl MockSpeechToText {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
        }
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(&self, _wav: Vec<u8>) -> Result<String> {
        Ok(self.transcript.clone())
    }
}

/// In-memory violation repository for testing without a database.
#[derive(Clone, Default)]
pub struct MockViolationRepository {
    violations: Arc<Mutex<Vec<Violation>>>,
}

impl MockViolationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Violation> {
        self.violations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ViolationRepository for MockViolationRepository {
    async fn record_violation(&self, violation: &Violation) -> Result<(), AppError> {
        self.violations.lock().unwrap().push(violation.clone());
        Ok(())
    }

    async fn query_violations(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Violation>, AppError> {
        let mut matching: Vec<Violation> = self
            .violations
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.user_id == user_id && v.recorded_at >= since)
            .cloned()
            .collect();
        matching.sort_by_key(|v| v.recorded_at);
        Ok(matching)
    }
}

/// Full pipeline wired to mocks. The ffmpeg-backed stages are constructed
/// but never reached in tests that use this helper.
pub fn pipeline_with_judge(
    judge: Arc<MockJudge>,
    classifier: Option<Arc<MockClassifier>>,
) -> ModalityPipeline {
    let judge: Arc<dyn ChatJudge> = judge;
    let classifier = classifier.map(|c| c as Arc<dyn TextClassifier>);

    let text_scorer = Arc::new(TextToxicityScorer::new(
        judge.clone(),
        classifier,
        None,
        "en".to_string(),
    ));
    let transcriber = Arc::new(Transcriber::new(
        AudioNormalizer::new("ffmpeg", "ffprobe"),
        Arc::new(MockSpeechToText::new("mock transcript")),
        25 * 1024 * 1024,
        300,
    ));
    let visual = Arc::new(VisualToxicityScorer::new(judge.clone()));
    let video = VideoAnalyzer::new(
        FrameSampler::new("ffmpeg"),
        transcriber.clone(),
        visual.clone(),
        judge.clone(),
    );

    ModalityPipeline::new(
        text_scorer,
        transcriber,
        visual,
        video,
        judge,
        25 * 1024 * 1024,
        20 * 1024 * 1024,
    )
}
