//! mov2mp4 - Batch MOV to MP4 conversion
//!
//! Command-line front end: resolves ffmpeg, collects the input files, runs the
//! batch on a background worker and renders its progress and final summary.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use mov2mp4::batch::display_name;
use mov2mp4::cli::{Args, Commands};
use mov2mp4::config::Config;
use mov2mp4::error::ConverterError;
use mov2mp4::inputs::{collect_inputs, file_size_mb};
use mov2mp4::locator::{BinaryLocator, INSTALL_HINT};
use mov2mp4::media::MediaConverterFactory;
use mov2mp4::quality::Quality;
use mov2mp4::workflow::{BatchEvent, BatchJob, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Convert { inputs, output, quality, json } => {
            let quality = quality
                .as_deref()
                .map(Quality::from_name)
                .unwrap_or(config.conversion.default_quality);
            convert(&config, inputs, output, quality, json).await?;
        }
        Commands::Check => {
            let ffmpeg = require_ffmpeg(&config)?;
            println!("FFmpeg: {}", ffmpeg.display());
            let converter = MediaConverterFactory::create_converter(ffmpeg);
            println!("Version: {}", converter.get_version_info().await?);
        }
        Commands::Presets => {
            println!("\nQuality Presets:");
            println!("{:<10} {:<40} {}", "Name", "Description", "FFmpeg options");
            println!("{}", "-".repeat(100));
            for quality in Quality::ALL {
                println!(
                    "{:<10} {:<40} {}",
                    quality.name(),
                    quality.description(),
                    quality.options().join(" ")
                );
            }
        }
        Commands::Config { save } => match save {
            Some(path) => {
                config.save_to_file(&path)?;
                println!("Configuration written to {}", path.display());
            }
            None => print!("{}", config.to_toml()?),
        },
    }

    Ok(())
}

async fn convert(
    config: &Config,
    inputs: Vec<PathBuf>,
    output_dir: Option<PathBuf>,
    quality: Quality,
    json: bool,
) -> Result<()> {
    let ffmpeg = require_ffmpeg(config)?;

    let selection = collect_inputs(&inputs);
    for error in selection.missing_errors() {
        if json {
            eprintln!("Error: {}", error);
        } else {
            println!("Error: {}", error);
        }
    }

    if let Some(dir) = &output_dir {
        tokio::fs::create_dir_all(dir).await?;
    }

    let converter = MediaConverterFactory::create_converter(ffmpeg);
    let workflow = Workflow::new(converter, &config.conversion);

    if !json {
        for file in &selection.files {
            println!("  {} ({:.1} MB)", display_name(file), file_size_mb(file));
        }
    }

    let job = BatchJob::new(selection.files, output_dir, quality);
    let mut handle = match workflow.start(job) {
        Ok(handle) => handle,
        Err(e) if e.is_usage() => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let pb = ProgressBar::new(100);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")?
        .progress_chars("#>-"));

    while let Some(event) = handle.next_event().await {
        if !json {
            if let Some(line) = event.report_line() {
                // Per-file lines belong on stdout whether or not the bar is drawn.
                pb.suspend(|| println!("{}", line));
            }
        }
        match event {
            BatchEvent::Started { total } => {
                info!("Converting {} files with {} quality", total, quality);
            }
            BatchEvent::FileStarted { file_name, .. } => pb.set_message(file_name),
            BatchEvent::FileFinished { progress, .. } => pb.set_position(progress.round() as u64),
        }
    }
    pb.finish_and_clear();

    let result = handle.wait().await?;
    if json {
        println!("{}", result.to_json()?);
    } else {
        println!("\n{}", result.summary(config.conversion.summary_error_chars));
    }

    Ok(())
}

/// Resolve ffmpeg or stop the session with install hints.
fn require_ffmpeg(config: &Config) -> Result<PathBuf> {
    match BinaryLocator::new(&config.ffmpeg).require() {
        Ok(path) => Ok(path),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", INSTALL_HINT);
            Err(ConverterError::FfmpegNotFound.into())
        }
    }
}

/// Console logging on stderr plus a daily-rotated file under `.mov2mp4/log`.
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".mov2mp4").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let (non_blocking_file, guard) = non_blocking(rolling::daily(&log_dir, "mov2mp4.log"));
    // Flushing stops once the guard drops; the process owns it until exit.
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stdout is reserved for conversion output.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    debug!("Logging at {} to {}", log_level, log_dir.display());

    Ok(())
}
