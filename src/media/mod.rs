// Media conversion layer
//
// - Commands: ffmpeg command line construction and execution
// - Processor: the ffmpeg-backed converter

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub use commands::*;
pub use processor::*;

use crate::batch::{ConversionOutcome, ConversionRequest};
use crate::error::Result;

/// Converts one file at a time.
///
/// Conversion failures are reported in the returned outcome, never as errors,
/// so a batch can keep going after any single file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaConverter: Send + Sync {
    /// Transcode `request.input_path` into `request.output_path`, overwriting it
    async fn convert(&self, request: &ConversionRequest) -> ConversionOutcome;

    /// Get media processor version information
    async fn get_version_info(&self) -> Result<String>;
}

/// Factory for creating converter instances
pub struct MediaConverterFactory;

impl MediaConverterFactory {
    /// Create the default converter implementation (FFmpeg-based)
    pub fn create_converter(binary_path: PathBuf) -> Arc<dyn MediaConverter> {
        Arc::new(FfmpegConverter::new(binary_path))
    }
}
