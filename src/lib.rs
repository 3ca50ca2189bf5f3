//! mov2mp4 - Batch MOV to MP4 conversion
//!
//! Converts QuickTime MOV files to MP4 by driving an external ffmpeg
//! executable, one file at a time, on a background worker that reports
//! progress after every file.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod inputs;
pub mod locator;
pub mod media;
pub mod quality;
pub mod workflow;

#[cfg(all(test, unix))]
mod test_support;
