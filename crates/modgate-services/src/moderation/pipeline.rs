//! Modality dispatch: one upload in, one `ScoringResult` out, always.
//!
//! The boundary contract is that `process` cannot fail: size limits are
//! checked before any remote call, and every internal failure is converted
//! into a result carrying a descriptive message and a sentinel score.

use std::sync::Arc;

use anyhow::{Context, Result};

use modgate_core::models::{DetectedModality, ScoringResult, ToxicityScore, Upload};
use modgate_processing::detect::detect_modality;
use modgate_processing::extract::ContentExtractor;

use super::combine_scores;
use super::text::TextToxicityScorer;
use super::transcriber::Transcriber;
use super::visual::{VideoAnalyzer, VisualToxicityScorer};
use crate::services::ChatJudge;

const DESCRIBE_FILE_SYSTEM: &str =
    "You are an AI that analyzes file content. Provide a concise description (3-5 sentences) \
     of what the file contains or what it appears to be.";

fn describe_file_prompt(content: &str, mime_type: &str) -> String {
    format!(
        "This is the content of a file with MIME type: {}.\n\nDescribe the value or content \
         that this file represents in 3-5 sentences. If the file content is short, display it \
         in its entirety.\n\nFile content:\n{}",
        mime_type, content
    )
}

pub struct ModalityPipeline {
    text_scorer: Arc<TextToxicityScorer>,
    transcriber: Arc<Transcriber>,
    visual: Arc<VisualToxicityScorer>,
    video: VideoAnalyzer,
    judge: Arc<dyn ChatJudge>,
    max_audio_bytes: usize,
    max_image_bytes: usize,
}

impl ModalityPipeline {
    pub fn new(
        text_scorer: Arc<TextToxicityScorer>,
        transcriber: Arc<Transcriber>,
        visual: Arc<VisualToxicityScorer>,
        video: VideoAnalyzer,
        judge: Arc<dyn ChatJudge>,
        max_audio_bytes: usize,
        max_image_bytes: usize,
    ) -> Self {
        Self {
            text_scorer,
            transcriber,
            visual,
            video,
            judge,
            max_audio_bytes,
            max_image_bytes,
        }
    }

    /// Dispatch an upload to its modality branch and normalize the outcome.
    /// A `ScoringResult` is always produced.
    #[tracing::instrument(skip(self, upload), fields(
        filename = %upload.filename,
        byte_size = upload.byte_size()
    ))]
    pub async fn process(&self, upload: &Upload) -> ScoringResult {
        let extension = upload.extension();
        let (modality, mime_type) = detect_modality(&upload.data, &extension);

        tracing::info!(
            modality = %modality.as_str(),
            mime_type = %mime_type,
            "Processing upload"
        );

        match modality {
            DetectedModality::Audio => self.process_audio(upload, &extension, &mime_type).await,
            DetectedModality::Image => self.process_image(upload, &mime_type).await,
            DetectedModality::Video => {
                self.video
                    .analyze(&upload.data, &extension, &mime_type)
                    .await
            }
            DetectedModality::Text => self.process_text(upload).await,
            DetectedModality::Document | DetectedModality::Archive | DetectedModality::Binary => {
                self.process_file(upload).await
            }
        }
    }

    async fn process_audio(
        &self,
        upload: &Upload,
        extension: &str,
        mime_type: &str,
    ) -> ScoringResult {
        if upload.data.len() > self.max_audio_bytes {
            return too_large_result("Audio", upload, self.max_audio_bytes, mime_type);
        }

        let transcript = match self.transcriber.transcribe(&upload.data, extension).await {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!(error = %e, "Audio analysis failed");
                return ScoringResult::new(
                    format!("Audio file that could not be analyzed: {}", e),
                    ToxicityScore::Unavailable,
                    mime_type,
                    upload.byte_size(),
                );
            }
        };

        let scores = self.text_scorer.score_text(&transcript).await;
        ScoringResult::new(
            format!("Audio file transcription: {}", transcript),
            combine_scores(scores.local, scores.remote),
            mime_type,
            upload.byte_size(),
        )
        .with_secondary(scores.remote)
    }

    async fn process_image(&self, upload: &Upload, mime_type: &str) -> ScoringResult {
        if upload.data.len() > self.max_image_bytes {
            return too_large_result("Image", upload, self.max_image_bytes, mime_type);
        }

        let description = match self.visual.describe_image(&upload.data).await {
            Ok(description) => description,
            Err(e) => {
                tracing::warn!(error = %e, "Image analysis failed");
                return ScoringResult::new(
                    format!("Image file that could not be analyzed: {}", e),
                    ToxicityScore::Unavailable,
                    mime_type,
                    upload.byte_size(),
                );
            }
        };

        let score = self.visual.score_description(&description).await;
        ScoringResult::new(description, score, mime_type, upload.byte_size())
    }

    /// Text uploads go through extraction and then the double-check text
    /// scorer, so they benefit from the local classifier as well.
    async fn process_text(&self, upload: &Upload) -> ScoringResult {
        let extracted = ContentExtractor::extract(&upload.data, &upload.filename);
        let scores = self.text_scorer.score_text(&extracted.text).await;
        ScoringResult::new(
            extracted.text,
            combine_scores(scores.local, scores.remote),
            extracted.mime_type,
            extracted.byte_size,
        )
        .with_secondary(scores.remote)
    }

    /// Documents, archives and unknown binaries: extract, let the judge
    /// describe the content, then score the description.
    async fn process_file(&self, upload: &Upload) -> ScoringResult {
        let extracted = ContentExtractor::extract(&upload.data, &upload.filename);

        let description = match self
            .describe_extracted(&extracted.text, &extracted.mime_type)
            .await
        {
            Ok(description) => description,
            Err(e) => {
                tracing::warn!(error = %e, "File description failed, scoring extracted text");
                extracted.text.clone()
            }
        };

        let score = self.visual.score_description(&description).await;
        ScoringResult::new(description, score, extracted.mime_type, extracted.byte_size)
    }

    async fn describe_extracted(&self, content: &str, mime_type: &str) -> Result<String> {
        self.judge
            .complete(DESCRIBE_FILE_SYSTEM, &describe_file_prompt(content, mime_type))
            .await
            .context("File description failed")
    }
}

fn too_large_result(
    kind: &str,
    upload: &Upload,
    limit_bytes: usize,
    mime_type: &str,
) -> ScoringResult {
    let size_mb = upload.data.len() as f64 / (1024.0 * 1024.0);
    let limit_mb = limit_bytes / (1024 * 1024);
    tracing::info!(
        size_mb = format!("{:.2}", size_mb).as_str(),
        limit_mb,
        "Upload exceeds size gate, skipping remote analysis"
    );
    ScoringResult::new(
        format!(
            "{} file is too large for analysis (size: {:.2} MB, limit: {} MB). Consider \
             compressing or trimming the file.",
            kind, size_mb, limit_mb
        ),
        ToxicityScore::Unavailable,
        mime_type,
        upload.byte_size(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{pipeline_with_judge, MockClassifier, MockJudge};
    use bytes::Bytes;

    #[tokio::test]
    async fn oversized_audio_short_circuits_without_transcription() {
        let judge = Arc::new(MockJudge::replying("0.9"));
        let pipeline = pipeline_with_judge(judge.clone(), None);

        // 30 MiB of silence-shaped bytes declared as MP3.
        let upload = Upload::new(Bytes::from(vec![0u8; 30 * 1024 * 1024]), "big.mp3");
        let result = pipeline.process(&upload).await;

        assert!(result.description.contains("too large for analysis"));
        assert!(result.description.contains("limit: 25 MB"));
        assert_eq!(result.toxicity_score, ToxicityScore::Unavailable);
        assert_eq!(result.toxicity_score.wire_value(), 0.5);
        // No remote call of any kind was attempted.
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn oversized_image_short_circuits() {
        let judge = Arc::new(MockJudge::replying("0.9"));
        let pipeline = pipeline_with_judge(judge.clone(), None);

        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.resize(21 * 1024 * 1024, 0);
        let upload = Upload::new(Bytes::from(data), "big.png");
        let result = pipeline.process(&upload).await;

        assert!(result.description.contains("too large for analysis"));
        assert_eq!(result.toxicity_score, ToxicityScore::Unavailable);
        assert_eq!(judge.call_count(), 0);
    }

    #[tokio::test]
    async fn text_upload_combines_local_and_remote_scores() {
        let judge = Arc::new(MockJudge::replying("0.2"));
        let classifier = Arc::new(MockClassifier::new(0.9, "toxic"));
        let pipeline = pipeline_with_judge(judge, Some(classifier));

        let upload = Upload::new(Bytes::from_static(b"some unpleasant words"), "message.txt");
        let result = pipeline.process(&upload).await;

        assert_eq!(result.toxicity_score, ToxicityScore::Computed(0.55));
        assert_eq!(result.secondary_score, Some(ToxicityScore::Computed(0.2)));
        assert_eq!(result.description, "some unpleasant words");
    }

    #[tokio::test]
    async fn json_upload_is_described_and_scored() {
        let judge = Arc::new(MockJudge::replying("0.0"));
        let pipeline = pipeline_with_judge(judge, None);

        let upload = Upload::new(Bytes::from_static(br#"{"a":1}"#), "data.json");
        let result = pipeline.process(&upload).await;

        assert_eq!(result.mime_type, "application/json");
        assert_eq!(result.byte_size, 7);
        assert_eq!(result.toxicity_score, ToxicityScore::Computed(0.0));
    }

    #[tokio::test]
    async fn judge_outage_still_produces_a_result() {
        let judge = Arc::new(MockJudge::failing());
        let pipeline = pipeline_with_judge(judge, None);

        let upload = Upload::new(Bytes::from_static(b"\x00\x01\x02\x03"), "blob.bin");
        let result = pipeline.process(&upload).await;

        assert_eq!(result.toxicity_score, ToxicityScore::Unavailable);
        assert!(!result.description.is_empty());
    }
}
