//! Audio transcription with proactive size handling.

use std::sync::Arc;

use anyhow::Result;

use modgate_processing::audio::{segment_count, AudioNormalizer};

use crate::services::SpeechToText;

pub struct Transcriber {
    normalizer: AudioNormalizer,
    stt: Arc<dyn SpeechToText>,
    /// Upstream service payload ceiling, respected before sending.
    max_payload_bytes: usize,
    segment_secs: u64,
}

impl Transcriber {
    pub fn new(
        normalizer: AudioNormalizer,
        stt: Arc<dyn SpeechToText>,
        max_payload_bytes: usize,
        segment_secs: u64,
    ) -> Self {
        Self {
            normalizer,
            stt,
            max_payload_bytes,
            segment_secs,
        }
    }

    /// Normalize, then transcribe in one shot or in fixed-length segments
    /// when the normalized payload exceeds the service limit. Segment
    /// transcripts are joined chronologically with single spaces; a failed
    /// segment contributes a visible unavailability marker instead of
    /// silently vanishing from the transcript. Temp artifacts are released
    /// when the normalized audio drops, on every path.
    pub async fn transcribe(&self, data: &[u8], extension: &str) -> Result<String> {
        let normalized = self.normalizer.normalize(data, extension).await?;

        if (normalized.byte_size as usize) <= self.max_payload_bytes {
            return self.stt.transcribe(normalized.read().await?).await;
        }

        tracing::info!(
            normalized_bytes = normalized.byte_size,
            duration_secs = normalized.duration_secs,
            segments = segment_count(normalized.duration_secs, self.segment_secs),
            "Normalized audio exceeds service limit, transcribing in segments"
        );

        let segments = self
            .normalizer
            .split_segments(&normalized, self.segment_secs)
            .await?;

        Ok(transcribe_segments(self.stt.as_ref(), segments).await)
    }
}

/// Transcribe segments in chronological order and join the transcripts
/// with single spaces. A failed segment contributes a visible
/// unavailability marker instead of silently vanishing from the
/// transcript.
async fn transcribe_segments(stt: &dyn SpeechToText, segments: Vec<Vec<u8>>) -> String {
    let mut parts = Vec::with_capacity(segments.len());
    for (index, segment) in segments.into_iter().enumerate() {
        match stt.transcribe(segment).await {
            Ok(text) => parts.push(text.trim().to_string()),
            Err(e) => {
                tracing::warn!(segment = index, error = %e, "Segment transcription failed");
                parts.push(format!("[segment {} unavailable]", index));
            }
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;

    /// Answers each call with the next scripted reply; `None` fails.
    struct ScriptedSpeechToText {
        replies: Mutex<VecDeque<Option<&'static str>>>,
    }

    impl ScriptedSpeechToText {
        fn new(replies: &[Option<&'static str>]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().copied().collect()),
            }
        }
    }

    #[async_trait]
    impl SpeechToText for ScriptedSpeechToText {
        async fn transcribe(&self, _wav: Vec<u8>) -> anyhow::Result<String> {
            match self.replies.lock().unwrap().pop_front().flatten() {
                Some(text) => Ok(text.to_string()),
                None => Err(anyhow!("speech service unavailable")),
            }
        }
    }

    fn three_segments() -> Vec<Vec<u8>> {
        vec![vec![1], vec![2], vec![3]]
    }

    #[tokio::test]
    async fn segment_transcripts_join_in_order_with_single_spaces() {
        let stt = ScriptedSpeechToText::new(&[Some(" first "), Some("second"), Some("third")]);

        let transcript = transcribe_segments(&stt, three_segments()).await;

        assert_eq!(transcript, "first second third");
    }

    #[tokio::test]
    async fn failed_middle_segment_leaves_marker_in_place() {
        let stt = ScriptedSpeechToText::new(&[Some("first"), None, Some("third")]);

        let transcript = transcribe_segments(&stt, three_segments()).await;

        assert_eq!(transcript, "first [segment 1 unavailable] third");
    }

    #[tokio::test]
    async fn every_segment_failing_still_yields_ordered_markers() {
        let stt = ScriptedSpeechToText::new(&[None, None]);

        let transcript = transcribe_segments(&stt, vec![vec![1], vec![2]]).await;

        assert_eq!(transcript, "[segment 0 unavailable] [segment 1 unavailable]");
    }
}
