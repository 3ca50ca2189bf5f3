use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::batch::{BatchResult, ConversionOutcome, ConversionRequest};
use crate::config::ConversionConfig;
use crate::error::{ConverterError, Result};
use crate::media::MediaConverter;
use crate::quality::Quality;

/// Everything a batch needs, handed to the worker by value.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub files: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub quality: Quality,
}

impl BatchJob {
    pub fn new(files: Vec<PathBuf>, output_dir: Option<PathBuf>, quality: Quality) -> Self {
        Self {
            files,
            output_dir,
            quality,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    FileStarted {
        index: usize,
        total: usize,
        file_name: String,
        input_path: PathBuf,
        output_path: PathBuf,
    },
    /// `progress` is the percentage of files done, reaching exactly 100 on the last one.
    FileFinished {
        outcome: ConversionOutcome,
        completed: usize,
        total: usize,
        progress: f64,
    },
}

impl BatchEvent {
    /// The line printed for this event in the per-file log, if any.
    pub fn report_line(&self) -> Option<String> {
        match self {
            BatchEvent::Started { .. } => None,
            BatchEvent::FileStarted { input_path, output_path, .. } => Some(format!(
                "Converting: {} -> {}",
                input_path.display(),
                output_path.display()
            )),
            BatchEvent::FileFinished { outcome, .. } if outcome.success => {
                Some(format!("✓ Successfully converted: {}", outcome.input))
            }
            BatchEvent::FileFinished { outcome, .. } => Some(format!(
                "✗ Failed to convert {}: {}",
                outcome.input,
                outcome.message.as_deref().unwrap_or_default().trim_end()
            )),
        }
    }
}

/// What the interactive side may observe about the workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowSnapshot {
    pub running: bool,
    pub progress: f64,
    pub current_file: Option<String>,
}

/// Output location for `input`: inside `output_dir` when given, otherwise
/// next to the input, with the extension replaced by the lower-cased `extension`.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(extension.to_lowercase());

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Convert every file of `job` in order, reporting each step through `on_event`.
///
/// A failed file is recorded and the loop moves on; nothing is rolled back.
pub async fn run_batch<F>(
    converter: &dyn MediaConverter,
    job: &BatchJob,
    extension: &str,
    on_event: F,
) -> Result<BatchResult>
where
    F: FnMut(BatchEvent),
{
    if job.files.is_empty() {
        return Err(ConverterError::NoFilesSelected);
    }
    Ok(drive_batch(converter, job, extension, on_event).await)
}

async fn drive_batch<F>(
    converter: &dyn MediaConverter,
    job: &BatchJob,
    extension: &str,
    mut on_event: F,
) -> BatchResult
where
    F: FnMut(BatchEvent),
{
    let total = job.files.len();
    let mut result = BatchResult::new(total);
    info!("Starting batch of {} files ({})", total, job.quality);
    on_event(BatchEvent::Started { total });

    for (index, input_path) in job.files.iter().enumerate() {
        let output_path = output_path_for(input_path, job.output_dir.as_deref(), extension);
        let request = ConversionRequest::new(input_path, output_path, job.quality);

        on_event(BatchEvent::FileStarted {
            index,
            total,
            file_name: request.file_name(),
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
        });

        let outcome = converter.convert(&request).await;
        if !outcome.success {
            warn!("Conversion failed: {}", outcome.input);
        }
        result.record(&outcome);

        let completed = index + 1;
        let progress = completed as f64 / total as f64 * 100.0;
        debug!("Batch progress: {:.1}%", progress);
        on_event(BatchEvent::FileFinished {
            outcome,
            completed,
            total,
            progress,
        });
    }

    info!(
        "Batch finished: {}/{} converted, {} failed",
        result.successful,
        result.total,
        result.failed()
    );
    result
}

/// Owns the idle/running state and runs at most one batch at a time.
pub struct Workflow {
    converter: Arc<dyn MediaConverter>,
    output_extension: String,
    state: Arc<watch::Sender<WorkflowSnapshot>>,
}

/// A batch running on the background worker.
pub struct BatchHandle {
    events: mpsc::UnboundedReceiver<BatchEvent>,
    task: JoinHandle<BatchResult>,
}

impl BatchHandle {
    /// Next progress event; `None` once the worker is done.
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    pub async fn wait(self) -> Result<BatchResult> {
        self.task
            .await
            .map_err(|e| ConverterError::Worker(e.to_string()))
    }
}

/// Puts the workflow back to idle when the worker ends, however it ends.
struct RunningGuard {
    state: Arc<watch::Sender<WorkflowSnapshot>>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            s.running = false;
            s.current_file = None;
        });
    }
}

impl Workflow {
    pub fn new(converter: Arc<dyn MediaConverter>, conversion: &ConversionConfig) -> Self {
        let (state, _) = watch::channel(WorkflowSnapshot::default());
        Self {
            converter,
            output_extension: conversion.output_extension(),
            state: Arc::new(state),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.state.subscribe()
    }

    /// Spawn the background worker for `job`.
    ///
    /// Rejected without any state change when `job` has no files or a batch
    /// is already running.
    pub fn start(&self, job: BatchJob) -> Result<BatchHandle> {
        if job.files.is_empty() {
            return Err(ConverterError::NoFilesSelected);
        }
        // The snapshot is the only running flag: claiming it and publishing
        // the new batch happen under the same write lock.
        let claimed = self.state.send_if_modified(|s| {
            if s.running {
                return false;
            }
            *s = WorkflowSnapshot {
                running: true,
                progress: 0.0,
                current_file: None,
            };
            true
        });
        if !claimed {
            return Err(ConverterError::ConversionInProgress);
        }

        let guard = RunningGuard {
            state: Arc::clone(&self.state),
        };
        let converter = Arc::clone(&self.converter);
        let state = Arc::clone(&self.state);
        let extension = self.output_extension.clone();
        let (tx, events) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let _guard = guard;
            drive_batch(converter.as_ref(), &job, &extension, |event| {
                match &event {
                    BatchEvent::FileStarted { file_name, .. } => {
                        let file_name = file_name.clone();
                        state.send_modify(|s| s.current_file = Some(file_name));
                    }
                    BatchEvent::FileFinished { progress, .. } => {
                        let progress = *progress;
                        state.send_modify(|s| s.progress = progress);
                    }
                    BatchEvent::Started { .. } => {}
                }
                // The receiver may have been dropped; the batch runs on regardless.
                let _ = tx.send(event);
            })
            .await
        });

        Ok(BatchHandle { events, task })
    }
}
