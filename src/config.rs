use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, ConverterError};
use crate::quality::Quality;

fn default_target_format() -> String {
    "mp4".to_string()
}

fn default_summary_error_chars() -> usize {
    100
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FfmpegConfig {
    /// Explicit ffmpeg executable, tried before any other location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<String>,
    /// Extra candidate locations, tried after the platform defaults
    #[serde(default)]
    pub search_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Preset used when none is given on the command line
    #[serde(default)]
    pub default_quality: Quality,
    /// Container format of the output; the file extension is its lower-case form
    #[serde(default = "default_target_format")]
    pub target_format: String,
    /// How much of each failure diagnostic the summary shows
    #[serde(default = "default_summary_error_chars")]
    pub summary_error_chars: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_quality: Quality::Medium,
            target_format: default_target_format(),
            summary_error_chars: default_summary_error_chars(),
        }
    }
}

impl ConversionConfig {
    /// Output file extension, always lower case.
    pub fn output_extension(&self) -> String {
        self.target_format.trim_start_matches('.').to_lowercase()
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConverterError::Config(format!("Failed to serialize config: {}", e)))
    }

    fn validate(&self) -> Result<()> {
        if self.conversion.output_extension().is_empty() {
            return Err(ConverterError::Config("target_format must not be empty".to_string()));
        }
        Ok(())
    }
}
