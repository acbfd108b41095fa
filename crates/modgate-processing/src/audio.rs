//! Audio normalization and segmentation via ffmpeg.
//!
//! Uploads are normalized to mono 16 kHz 16-bit PCM before transcription,
//! which both shrinks the payload and evens out source quality. All decoded
//! artifacts live in a `TempDir` owned by [`NormalizedAudio`], so they are
//! released on every exit path when the value drops.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

pub struct AudioNormalizer {
    ffmpeg_path: String,
    ffprobe_path: String,
}

/// A normalized WAV scoped to its temp directory.
pub struct NormalizedAudio {
    // Held for its Drop side effect: deleting the decoded artifacts.
    _temp: TempDir,
    wav_path: PathBuf,
    pub byte_size: u64,
    pub duration_secs: f64,
}

impl NormalizedAudio {
    pub fn wav_path(&self) -> &Path {
        &self.wav_path
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.wav_path)
            .await
            .context("Failed to read normalized audio")
    }
}

impl AudioNormalizer {
    pub fn new(ffmpeg_path: impl Into<String>, ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Decode arbitrary audio bytes and re-encode as mono 16 kHz s16 WAV.
    pub async fn normalize(&self, data: &[u8], extension: &str) -> Result<NormalizedAudio> {
        let temp = TempDir::new().context("Failed to create temp directory")?;
        let input_name = if extension.is_empty() {
            "input.bin".to_string()
        } else {
            format!("input.{}", extension)
        };
        let input_path = temp.path().join(input_name);
        tokio::fs::write(&input_path, data)
            .await
            .context("Failed to write audio to temp file")?;

        let wav_path = temp.path().join("normalized.wav");
        self.run_ffmpeg(&[
            "-i",
            &input_path.to_string_lossy(),
            "-ac",
            "1",
            "-ar",
            "16000",
            "-sample_fmt",
            "s16",
            "-y",
            &wav_path.to_string_lossy(),
        ])
        .await
        .context("Failed to normalize audio")?;

        let byte_size = tokio::fs::metadata(&wav_path)
            .await
            .context("Normalized audio missing")?
            .len();
        let duration_secs = self.probe_duration(&wav_path).await?;

        tracing::debug!(
            input_bytes = data.len(),
            normalized_bytes = byte_size,
            duration_secs,
            "Audio normalized"
        );

        Ok(NormalizedAudio {
            _temp: temp,
            wav_path,
            byte_size,
            duration_secs,
        })
    }

    /// Cut the normalized WAV into fixed-length segments, in chronological
    /// order. Segment files share the audio's temp directory.
    pub async fn split_segments(
        &self,
        audio: &NormalizedAudio,
        segment_secs: u64,
    ) -> Result<Vec<Vec<u8>>> {
        let count = segment_count(audio.duration_secs, segment_secs);
        let dir = audio
            .wav_path
            .parent()
            .ok_or_else(|| anyhow!("Normalized audio has no parent directory"))?;

        let mut segments = Vec::with_capacity(count);
        for index in 0..count {
            let start = index as u64 * segment_secs;
            let segment_path = dir.join(format!("segment_{:04}.wav", index));
            self.run_ffmpeg(&[
                "-ss",
                &start.to_string(),
                "-t",
                &segment_secs.to_string(),
                "-i",
                &audio.wav_path.to_string_lossy(),
                "-c",
                "copy",
                "-y",
                &segment_path.to_string_lossy(),
            ])
            .await
            .with_context(|| format!("Failed to cut segment {}", index))?;

            segments.push(
                tokio::fs::read(&segment_path)
                    .await
                    .with_context(|| format!("Failed to read segment {}", index))?,
            );
        }
        Ok(segments)
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                &path.to_string_lossy(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("ffprobe failed: {}", stderr));
        }

        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse::<f64>()
            .context("ffprobe returned a non-numeric duration")
    }

    async fn run_ffmpeg(&self, args: &[&str]) -> Result<()> {
        let output = Command::new(&self.ffmpeg_path)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("FFmpeg failed: {}", stderr));
        }
        Ok(())
    }
}

/// Number of fixed-length segments needed to cover `duration_secs`.
pub fn segment_count(duration_secs: f64, segment_secs: u64) -> usize {
    if duration_secs <= 0.0 || segment_secs == 0 {
        return 0;
    }
    (duration_secs / segment_secs as f64).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_count_covers_whole_duration() {
        assert_eq!(segment_count(0.0, 300), 0);
        assert_eq!(segment_count(299.9, 300), 1);
        assert_eq!(segment_count(300.0, 300), 1);
        assert_eq!(segment_count(300.1, 300), 2);
        assert_eq!(segment_count(1800.0, 300), 6);
        assert_eq!(segment_count(1801.0, 300), 7);
    }

    #[test]
    fn zero_segment_length_yields_no_segments() {
        assert_eq!(segment_count(100.0, 0), 0);
    }
}
