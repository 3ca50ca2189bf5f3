use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("FFmpeg is not installed or not found")]
    FfmpegNotFound,

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Conversion worker failed: {0}")]
    Worker(String),

    #[error("No files selected")]
    NoFilesSelected,

    #[error("Conversion in progress")]
    ConversionInProgress,
}

impl ConverterError {
    /// Rejections of a start request that leave the workflow untouched.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::NoFilesSelected | Self::ConversionInProgress)
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;
