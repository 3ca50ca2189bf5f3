use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, ConverterError};
use crate::quality::Quality;

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: PathBuf,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<P: Into<PathBuf>, S: Into<String>>(binary_path: P, description: S) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Append the option tokens of a quality preset
    pub fn preset(self, quality: Quality) -> Self {
        self.args(quality.options().iter().copied())
    }

    /// Command line as a single string, for logging
    pub fn display(&self) -> String {
        let mut line = self.binary_path.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Run to completion, capturing stdout and stderr.
    ///
    /// Only a failure to launch is an error; the exit status is left to the caller.
    pub async fn run(&self) -> std::io::Result<Output> {
        debug!("Executing media processing command: {}", self.display());
        debug!("Description: {}", self.description);

        Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
    }

    /// Run and treat a non-zero exit as an error carrying stderr.
    pub async fn execute(&self) -> Result<Output> {
        let output = self.run().await
            .map_err(|e| ConverterError::Media(format!("Failed to execute media processor: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConverterError::Media(format!(
                "{} failed: {}",
                self.description,
                stderr
            )));
        }

        Ok(output)
    }
}

/// Builder for the commands the converter issues
pub struct MediaCommandBuilder {
    binary_path: PathBuf,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<P: Into<PathBuf>>(binary_path: P) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// `<ffmpeg> -i <input> <preset options...> -y <output>`
    pub fn transcode<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        quality: Quality,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, format!("Transcode ({})", quality))
            .input(input_path)
            .preset(quality)
            .overwrite()
            .output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check")
            .arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_argument_order() {
        let builder = MediaCommandBuilder::new("/usr/bin/ffmpeg");
        let cmd = builder.transcode("/in/clip.MOV", "/out/clip.mp4", Quality::High);

        assert_eq!(cmd.binary_path, PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(
            cmd.args,
            vec![
                "-i", "/in/clip.MOV",
                "-c:v", "libx264", "-crf", "18", "-c:a", "aac", "-b:a", "192k",
                "-y", "/out/clip.mp4",
            ]
        );
    }

    #[test]
    fn test_custom_preset_passes_audio_through() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let cmd = builder.transcode("a.mov", "a.mp4", Quality::Custom);
        assert_eq!(
            cmd.display(),
            "ffmpeg -i a.mov -c:v libx264 -crf 20 -c:a copy -y a.mp4"
        );
    }

    #[test]
    fn test_version_check() {
        let cmd = MediaCommandBuilder::new("ffmpeg").version_check();
        assert_eq!(cmd.args, vec!["-version"]);
    }

    #[tokio::test]
    async fn test_execute_reports_launch_failure() {
        let cmd = MediaCommandBuilder::new("/nonexistent/ffmpeg-xyz").version_check();
        assert!(matches!(cmd.execute().await, Err(ConverterError::Media(_))));
    }
}
