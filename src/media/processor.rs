use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use crate::batch::{ConversionOutcome, ConversionRequest};
use crate::error::Result;
use super::{MediaCommandBuilder, MediaConverter};

/// ffmpeg-backed converter
pub struct FfmpegConverter {
    command_builder: MediaCommandBuilder,
}

impl FfmpegConverter {
    /// Create a converter around a resolved ffmpeg executable
    pub fn new<P: Into<PathBuf>>(binary_path: P) -> Self {
        Self {
            command_builder: MediaCommandBuilder::new(binary_path),
        }
    }
}

#[async_trait]
impl MediaConverter for FfmpegConverter {
    async fn convert(&self, request: &ConversionRequest) -> ConversionOutcome {
        let file_name = request.file_name();
        info!(
            "Converting {} -> {} ({})",
            request.input_path.display(),
            request.output_path.display(),
            request.quality
        );

        let command = self.command_builder.transcode(
            &request.input_path,
            &request.output_path,
            request.quality,
        );

        let started = Instant::now();
        match command.run().await {
            Ok(output) if output.status.success() => {
                info!("Converted {} in {:.1?}", file_name, started.elapsed());
                ConversionOutcome::succeeded(file_name)
            }
            Ok(output) => {
                warn!("FFmpeg exited with {} for {}", output.status, file_name);
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                ConversionOutcome::failed(file_name, stderr)
            }
            Err(e) => {
                warn!("Failed to launch FFmpeg for {}: {}", file_name, e);
                ConversionOutcome::failed(file_name, e.to_string())
            }
        }
    }

    async fn get_version_info(&self) -> Result<String> {
        let output = self.command_builder.version_check().execute().await?;
        let version_info = String::from_utf8_lossy(&output.stdout);
        Ok(version_info.lines().next().unwrap_or("Unknown version").to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::quality::Quality;
    use crate::test_support::fake_ffmpeg;
    use assert_fs::prelude::*;

    #[tokio::test]
    async fn test_success_writes_output() {
        let temp = assert_fs::TempDir::new().unwrap();
        let ffmpeg = fake_ffmpeg(temp.path());
        let input = temp.child("clip.mov");
        input.write_str("movie").unwrap();
        let output = temp.child("clip.mp4");

        let converter = FfmpegConverter::new(&ffmpeg);
        let outcome = converter
            .convert(&ConversionRequest::new(input.path(), output.path(), Quality::Medium))
            .await;

        assert!(outcome.success, "{:?}", outcome);
        assert_eq!(outcome.input, "clip.mov");
        assert!(outcome.message.is_none());
        let written = std::fs::read_to_string(output.path()).unwrap();
        assert!(written.contains("-crf 23"));
        assert!(written.trim_end().ends_with(&format!("-y {}", output.path().display())));
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let temp = assert_fs::TempDir::new().unwrap();
        let ffmpeg = fake_ffmpeg(temp.path());
        let input = temp.child("bad_clip.mov");
        input.write_str("garbage").unwrap();

        let converter = FfmpegConverter::new(&ffmpeg);
        let outcome = converter
            .convert(&ConversionRequest::new(input.path(), temp.path().join("bad_clip.mp4"), Quality::Low))
            .await;

        assert!(!outcome.success);
        assert!(outcome.message.unwrap().contains("Invalid data found when processing input"));
    }

    #[tokio::test]
    async fn test_launch_failure_is_an_outcome() {
        let converter = FfmpegConverter::new("/nonexistent/bin/ffmpeg-xyz");
        let outcome = converter
            .convert(&ConversionRequest::new("/tmp/a.mov", "/tmp/a.mp4", Quality::High))
            .await;

        assert!(!outcome.success);
        assert!(!outcome.message.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_version_info() {
        let temp = assert_fs::TempDir::new().unwrap();
        let converter = FfmpegConverter::new(fake_ffmpeg(temp.path()));
        assert_eq!(converter.get_version_info().await.unwrap(), "ffmpeg version 6.1-test");
    }
}
