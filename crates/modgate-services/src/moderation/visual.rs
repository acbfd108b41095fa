//! Visual scoring: vision-judge descriptions for images and video frames,
//! and the full video analysis flow (audio track + frames + merge + score).

use std::sync::Arc;

use anyhow::{Context, Result};

use modgate_core::models::{ScoringResult, ToxicityScore};
use modgate_processing::video::{select_representative, FrameSampler};

use super::transcriber::Transcriber;
use crate::services::ChatJudge;

const DESCRIBE_IMAGE_SYSTEM: &str =
    "You are an AI that analyzes images for content and potential toxicity.";
const DESCRIBE_IMAGE_PROMPT: &str =
    "Describe the content of this image in detail and identify any potentially toxic, \
     harmful, offensive, or inappropriate content.";

const DESCRIBE_FRAMES_SYSTEM: &str =
    "You are an AI that analyzes video frames for content and potential toxicity.";
const DESCRIBE_FRAMES_PROMPT: &str =
    "Analyze these frames from a video. Describe what you see and identify any potentially \
     toxic, harmful, offensive, or inappropriate content.";

const ANALYZE_TRANSCRIPT_SYSTEM: &str =
    "You are an AI that analyzes audio transcripts for content and toxicity.";

const MERGE_SYSTEM: &str =
    "You are an AI that writes detailed descriptions by combining visual and audio information.";

const SCORE_SYSTEM: &str =
    "You are an AI that assigns toxicity scores to content based on neutral descriptions. \
     You respond only with a number between 0 and 1.";

fn analyze_transcript_prompt(transcript: &str) -> String {
    format!(
        "Analyze the following audio transcript from a video:\n\n\"{}\"\n\nProvide:\n\
         1. A concise description of what is being discussed or said\n\
         2. Any potentially toxic, harmful, offensive, or inappropriate content",
        transcript
    )
}

fn merge_prompt(visual: &str, audio: &str) -> String {
    format!(
        "Combine the following visual and audio analysis from the same video into one \
         coherent, detailed description. Describe what visually happens, what is said, the \
         emotional tone, and any explicit, offensive or inappropriate language. Be explicit \
         where needed; do not sanitize or soften the content. Do not assign any scores.\n\n\
         VISUAL ANALYSIS:\n{}\n\nAUDIO ANALYSIS:\n{}",
        visual, audio
    )
}

fn score_prompt(description: &str) -> String {
    format!(
        "Based solely on this description, assign a toxicity score between 0.0 and 1.0 \
         where 0.0 means completely benign and 1.0 means extremely toxic, harmful or \
         inappropriate. Provide ONLY the numeric value.\n\nDescription:\n{}",
        description
    )
}

/// Vision-judge wrapper: describe image/frame content, then score the
/// description.
pub struct VisualToxicityScorer {
    judge: Arc<dyn ChatJudge>,
}

impl VisualToxicityScorer {
    pub fn new(judge: Arc<dyn ChatJudge>) -> Self {
        Self { judge }
    }

    pub async fn describe_image(&self, image: &[u8]) -> Result<String> {
        let images = [image.to_vec()];
        self.judge
            .complete_with_images(DESCRIBE_IMAGE_SYSTEM, DESCRIBE_IMAGE_PROMPT, &images)
            .await
            .context("Image description failed")
    }

    pub async fn describe_frames(&self, frames: &[Vec<u8>]) -> Result<String> {
        self.judge
            .complete_with_images(DESCRIBE_FRAMES_SYSTEM, DESCRIBE_FRAMES_PROMPT, frames)
            .await
            .context("Frame description failed")
    }

    /// Numeric toxicity for a description. Service failure degrades to
    /// `Unavailable`; a reply that is not a bare number is `ParseFailed`.
    pub async fn score_description(&self, description: &str) -> ToxicityScore {
        match self
            .judge
            .complete(SCORE_SYSTEM, &score_prompt(description))
            .await
        {
            Ok(reply) => ToxicityScore::parse(&reply),
            Err(e) => {
                tracing::warn!(error = %e, "Description scoring failed");
                ToxicityScore::Unavailable
            }
        }
    }
}

/// Full video flow: demux → transcribe + describe → merge → score. Every
/// stage degrades to a partial result; this never errors out to the caller.
pub struct VideoAnalyzer {
    sampler: FrameSampler,
    transcriber: Arc<Transcriber>,
    visual: Arc<VisualToxicityScorer>,
    judge: Arc<dyn ChatJudge>,
}

impl VideoAnalyzer {
    pub fn new(
        sampler: FrameSampler,
        transcriber: Arc<Transcriber>,
        visual: Arc<VisualToxicityScorer>,
        judge: Arc<dyn ChatJudge>,
    ) -> Self {
        Self {
            sampler,
            transcriber,
            visual,
            judge,
        }
    }

    pub async fn analyze(&self, data: &[u8], extension: &str, mime_type: &str) -> ScoringResult {
        let byte_size = data.len() as u64;

        let parts = match self.sampler.decompose(data, extension).await {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!(error = %e, "Video decomposition failed");
                return ScoringResult::new(
                    format!("Video file that could not be analyzed: {}", e),
                    ToxicityScore::Unavailable,
                    mime_type,
                    byte_size,
                );
            }
        };

        let audio_analysis = self.analyze_audio_track(&parts).await;

        let indices = select_representative(parts.frame_count());
        let frames = parts.read_frames(&indices).await;
        let visual_analysis = if frames.is_empty() {
            "No frames extracted from video".to_string()
        } else {
            match self.visual.describe_frames(&frames).await {
                Ok(description) => description,
                Err(e) => {
                    tracing::warn!(error = %e, "Frame analysis failed");
                    "Visual content unavailable".to_string()
                }
            }
        };

        let description = match self
            .judge
            .complete(MERGE_SYSTEM, &merge_prompt(&visual_analysis, &audio_analysis))
            .await
        {
            Ok(merged) => merged,
            Err(e) => {
                tracing::warn!(error = %e, "Description merge failed");
                format!(
                    "Visual: {}\nAudio: {}",
                    visual_analysis, audio_analysis
                )
            }
        };

        let score = self.visual.score_description(&description).await;

        ScoringResult::new(description, score, mime_type, byte_size)
    }

    async fn analyze_audio_track(&self, parts: &modgate_processing::video::VideoParts) -> String {
        let audio = match parts.read_audio().await {
            Ok(Some(audio)) => audio,
            Ok(None) => return "No audio track present".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Audio track read failed");
                return "Audio content unavailable".to_string();
            }
        };

        let transcript = match self.transcriber.transcribe(&audio, "mp3").await {
            Ok(transcript) => transcript,
            Err(e) => {
                tracing::warn!(error = %e, "Audio track transcription failed");
                return "Audio content unavailable".to_string();
            }
        };

        match self
            .judge
            .complete(
                ANALYZE_TRANSCRIPT_SYSTEM,
                &analyze_transcript_prompt(&transcript),
            )
            .await
        {
            Ok(analysis) => format!("Transcript: {}\nAnalysis: {}", transcript, analysis),
            Err(e) => {
                tracing::warn!(error = %e, "Transcript analysis failed");
                format!("Transcript: {}", transcript)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockJudge;

    #[tokio::test]
    async fn unparsable_score_reply_is_parse_failed() {
        let scorer = VisualToxicityScorer::new(Arc::new(MockJudge::replying("abc")));
        let score = scorer.score_description("a description").await;
        assert_eq!(score, ToxicityScore::ParseFailed);
    }

    #[tokio::test]
    async fn judge_outage_is_unavailable() {
        let scorer = VisualToxicityScorer::new(Arc::new(MockJudge::failing()));
        let score = scorer.score_description("a description").await;
        assert_eq!(score, ToxicityScore::Unavailable);
    }

    #[tokio::test]
    async fn numeric_reply_is_computed() {
        let scorer = VisualToxicityScorer::new(Arc::new(MockJudge::replying("0.35")));
        let score = scorer.score_description("a description").await;
        assert_eq!(score, ToxicityScore::Computed(0.35));
    }
}
