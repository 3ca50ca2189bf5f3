//! Per-file requests and outcomes, and the aggregate result of a batch.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::quality::Quality;

/// One file to transcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub quality: Quality,
}

impl ConversionRequest {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input_path: P, output_path: Q, quality: Quality) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            quality,
        }
    }

    /// Base name of the input, as shown to the user.
    pub fn file_name(&self) -> String {
        display_name(&self.input_path)
    }
}

/// Result of a single transcode attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutcome {
    pub input: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConversionOutcome {
    pub fn succeeded<S: Into<String>>(input: S) -> Self {
        Self {
            input: input.into(),
            success: true,
            message: None,
        }
    }

    pub fn failed<S: Into<String>, M: Into<String>>(input: S, message: M) -> Self {
        Self {
            input: input.into(),
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedConversion {
    pub file_name: String,
    pub message: String,
}

/// Aggregate of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub successful: usize,
    pub failures: Vec<FailedConversion>,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            successful: 0,
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: &ConversionOutcome) {
        if outcome.success {
            self.successful += 1;
        } else {
            self.failures.push(FailedConversion {
                file_name: outcome.input.clone(),
                message: outcome.message.clone().unwrap_or_default(),
            });
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Every input has been accounted for.
    pub fn is_complete(&self) -> bool {
        self.successful + self.failures.len() == self.total
    }

    /// Machine-readable report for `convert --json`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable report with each diagnostic cut to `max_error_chars`.
    pub fn summary(&self, max_error_chars: usize) -> String {
        let mut out = String::from("Conversion completed!\n\n");
        let _ = write!(
            out,
            "Successfully converted: {}/{} files",
            self.successful, self.total
        );

        if !self.failures.is_empty() {
            out.push_str("\n\nFailed conversions:");
            for failure in &self.failures {
                let _ = write!(
                    out,
                    "\n- {}: {}...",
                    failure.file_name,
                    truncate_chars(&failure.message, max_error_chars)
                );
            }
        }

        out
    }
}

/// Base name of `path`, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
