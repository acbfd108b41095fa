//! Video decomposition: audio track demux and 1-fps frame extraction.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

pub struct FrameSampler {
    ffmpeg_path: String,
}

/// Extracted pieces of a video, scoped to one temp directory.
pub struct VideoParts {
    _temp: TempDir,
    audio_path: Option<PathBuf>,
    frame_paths: Vec<PathBuf>,
}

impl VideoParts {
    pub fn frame_count(&self) -> usize {
        self.frame_paths.len()
    }

    pub fn has_audio(&self) -> bool {
        self.audio_path.is_some()
    }

    pub async fn read_audio(&self) -> Result<Option<Vec<u8>>> {
        match &self.audio_path {
            Some(path) => Ok(Some(
                tokio::fs::read(path)
                    .await
                    .context("Failed to read extracted audio track")?,
            )),
            None => Ok(None),
        }
    }

    /// Read frames at the given indices, skipping any that fail to load.
    pub async fn read_frames(&self, indices: &[usize]) -> Vec<Vec<u8>> {
        let mut frames = Vec::with_capacity(indices.len());
        for &index in indices {
            let Some(path) = self.frame_paths.get(index) else {
                continue;
            };
            match tokio::fs::read(path).await {
                Ok(bytes) => frames.push(bytes),
                Err(e) => {
                    tracing::warn!(frame_index = index, error = %e, "Skipping unreadable frame")
                }
            }
        }
        frames
    }
}

impl FrameSampler {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Demux the audio track and extract one frame per second. A missing or
    /// undecodable audio track is not an error; frame extraction failure is.
    pub async fn decompose(&self, data: &[u8], extension: &str) -> Result<VideoParts> {
        let temp = TempDir::new().context("Failed to create temp directory")?;
        let input_name = if extension.is_empty() {
            "input.mp4".to_string()
        } else {
            format!("input.{}", extension)
        };
        let input_path = temp.path().join(input_name);
        tokio::fs::write(&input_path, data)
            .await
            .context("Failed to write video to temp file")?;

        let audio_path = temp.path().join("audio.mp3");
        let audio_path = match self
            .run_ffmpeg(&[
                "-i",
                &input_path.to_string_lossy(),
                "-q:a",
                "0",
                "-map",
                "a",
                "-y",
                &audio_path.to_string_lossy(),
            ])
            .await
        {
            Ok(()) => Some(audio_path),
            Err(e) => {
                tracing::warn!(error = %e, "No audio track extracted from video");
                None
            }
        };

        let frames_dir = temp.path().join("frames");
        tokio::fs::create_dir_all(&frames_dir)
            .await
            .context("Failed to create frames directory")?;
        self.run_ffmpeg(&[
            "-i",
            &input_path.to_string_lossy(),
            "-vf",
            "fps=1",
            "-y",
            &frames_dir.join("frame_%04d.jpg").to_string_lossy(),
        ])
        .await
        .context("Failed to extract video frames")?;

        let mut frame_paths = Vec::new();
        let mut entries = tokio::fs::read_dir(&frames_dir)
            .await
            .context("Failed to list extracted frames")?;
        while let Some(entry) = entries.next_entry().await? {
            frame_paths.push(entry.path());
        }
        frame_paths.sort();

        tracing::debug!(
            frame_count = frame_paths.len(),
            has_audio = audio_path.is_some(),
            "Video decomposed"
        );

        Ok(VideoParts {
            _temp: temp,
            audio_path,
            frame_paths,
        })
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

/// Representative frame indices at relative positions {0, 1/4, 1/2, 3/4, 1}
/// of the sequence, or every frame when fewer than five exist.
pub fn select_representative(frame_count: usize) -> Vec<usize> {
    if frame_count == 0 {
        return Vec::new();
    }
    if frame_count < 5 {
        return (0..frame_count).collect();
    }
    let mut indices = vec![
        0,
        frame_count / 4,
        frame_count / 2,
        3 * frame_count / 4,
        frame_count - 1,
    ];
    indices.dedup();
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_frames_select_expected_indices() {
        assert_eq!(select_representative(12), vec![0, 3, 6, 9, 11]);
    }

    #[test]
    fn fewer_than_five_frames_selects_all() {
        assert_eq!(select_representative(0), Vec::<usize>::new());
        assert_eq!(select_representative(1), vec![0]);
        assert_eq!(select_representative(4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn exactly_five_frames_selects_each_once() {
        assert_eq!(select_representative(5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn large_counts_stay_in_bounds_and_ordered() {
        let indices = select_representative(1000);
        assert_eq!(indices, vec![0, 250, 500, 750, 999]);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }
}
