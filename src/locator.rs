//! Finding a working ffmpeg executable.
//!
//! Candidates are tried in priority order: an explicit override from the
//! configuration, the copy bundled next to the executable, whatever `PATH`
//! resolves, the usual per-platform install locations, and finally any extra
//! paths from the configuration. The first candidate whose `-version` check
//! exits successfully wins.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::config::FfmpegConfig;
use crate::error::{ConverterError, Result};

const FFMPEG: &str = "ffmpeg";

#[cfg(target_os = "windows")]
const PLATFORM_PATHS: &[&str] = &[
    r"C:\ProgramData\chocolatey\lib\ffmpeg-full\tools\ffmpeg\bin\ffmpeg.exe",
    r"C:\ProgramData\chocolatey\lib\ffmpeg\tools\ffmpeg\bin\ffmpeg.exe",
    r"C:\ffmpeg\bin\ffmpeg.exe",
];

#[cfg(target_os = "macos")]
const PLATFORM_PATHS: &[&str] = &[
    "/opt/homebrew/bin/ffmpeg", // Apple Silicon
    "/usr/local/bin/ffmpeg",    // Intel
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const PLATFORM_PATHS: &[&str] = &["/usr/bin/ffmpeg", "/usr/local/bin/ffmpeg", "/snap/bin/ffmpeg"];

/// Shown when no candidate answers the version check.
pub const INSTALL_HINT: &str = "Please install FFmpeg:\n\
    - Windows: choco install ffmpeg-full\n\
    - macOS: brew install ffmpeg\n\
    - Linux: sudo apt install ffmpeg";

pub struct BinaryLocator {
    candidates: Vec<PathBuf>,
}

impl BinaryLocator {
    pub fn new(config: &FfmpegConfig) -> Self {
        let mut candidates = Vec::new();

        if let Some(path) = &config.binary_path {
            candidates.push(PathBuf::from(path));
        }
        candidates.extend(bundled_candidates());
        if let Ok(path) = which::which(FFMPEG) {
            candidates.push(path);
        }
        candidates.extend(PLATFORM_PATHS.iter().map(PathBuf::from));
        candidates.extend(config.search_paths.iter().map(PathBuf::from));

        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that passes the version check.
    pub fn resolve(&self) -> Option<PathBuf> {
        let found = resolve_first(self.candidates.iter().cloned(), answers_version_check);
        match &found {
            Some(path) => info!("Found FFmpeg at: {}", path.display()),
            None => debug!("No FFmpeg among {} candidates", self.candidates.len()),
        }
        found
    }

    /// Like [`resolve`](Self::resolve), but a missing tool is an error.
    pub fn require(&self) -> Result<PathBuf> {
        self.resolve().ok_or(ConverterError::FfmpegNotFound)
    }
}

/// Return the first candidate accepted by `accepts`, in order.
pub fn resolve_first<I, F>(candidates: I, mut accepts: F) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
    F: FnMut(&Path) -> bool,
{
    candidates.into_iter().find(|candidate| accepts(candidate))
}

/// Run `<path> -version` and report whether it exited 0.
pub fn answers_version_check(path: &Path) -> bool {
    debug!("Checking {}", path.display());
    Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn bundled_candidates() -> Vec<PathBuf> {
    let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(FFMPEG)))
    else {
        return Vec::new();
    };

    vec![dir.join("ffmpeg.exe"), dir.join(FFMPEG)]
}
