//! Service and repository wiring.

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;

use modgate_core::{Config, ThresholdStore};
use modgate_db::{PostgresViolationRepository, ViolationRepository};
use modgate_processing::audio::AudioNormalizer;
use modgate_processing::video::FrameSampler;
use modgate_services::{
    ChatJudge, HttpTextClassifier, LibreTranslateService, ModalityPipeline, OpenAiService,
    SpeechToText, TextClassifier, TextToxicityScorer, Transcriber, TranslationProvider,
    VideoAnalyzer, ViolationGate, VisualToxicityScorer,
};

use crate::state::AppState;

pub fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let openai = Arc::new(OpenAiService::new(
        config.openai_api_key.clone(),
        config.openai_api_base.clone(),
        config.openai_chat_model.clone(),
        config.openai_transcribe_model.clone(),
    ));
    let judge: Arc<dyn ChatJudge> = openai.clone();
    let stt: Arc<dyn SpeechToText> = openai;

    let classifier: Option<Arc<dyn TextClassifier>> = config
        .classifier_url
        .clone()
        .map(|url| Arc::new(HttpTextClassifier::new(url)) as Arc<dyn TextClassifier>);
    if classifier.is_none() {
        tracing::info!("No classifier URL configured, local scoring pass disabled");
    }

    let translator: Option<Arc<dyn TranslationProvider>> = config
        .translate_url
        .clone()
        .map(|url| Arc::new(LibreTranslateService::new(url)) as Arc<dyn TranslationProvider>);
    if translator.is_none() {
        tracing::info!("No translate URL configured, scoring original text directly");
    }

    let text_scorer = Arc::new(TextToxicityScorer::new(
        judge.clone(),
        classifier,
        translator,
        config.translate_target.clone(),
    ));

    let normalizer = AudioNormalizer::new(&config.ffmpeg_path, &config.ffprobe_path);
    let transcriber = Arc::new(Transcriber::new(
        normalizer,
        stt,
        config.max_audio_bytes,
        config.segment_seconds,
    ));

    let visual = Arc::new(VisualToxicityScorer::new(judge.clone()));
    let video = VideoAnalyzer::new(
        FrameSampler::new(&config.ffmpeg_path),
        transcriber.clone(),
        visual.clone(),
        judge.clone(),
    );

    let pipeline = ModalityPipeline::new(
        text_scorer.clone(),
        transcriber,
        visual,
        video,
        judge,
        config.max_audio_bytes,
        config.max_image_bytes,
    );

    let violations: Arc<dyn ViolationRepository> =
        Arc::new(PostgresViolationRepository::new(pool));
    let threshold = Arc::new(ThresholdStore::new(config.default_threshold));
    let gate = ViolationGate::new(violations.clone(), threshold.clone());

    tracing::info!(
        default_threshold = config.default_threshold,
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        pipeline,
        text_scorer,
        gate,
        violations,
        threshold,
    }))
}
