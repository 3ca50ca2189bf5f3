use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ConverterError;

const SOURCE_EXTENSION: &str = "mov";

/// Inputs split into what can be converted and what does not exist.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InputSelection {
    pub files: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

impl InputSelection {
    /// One `FileNotFound` per input that does not exist, in input order.
    pub fn missing_errors(&self) -> impl Iterator<Item = ConverterError> + '_ {
        self.missing
            .iter()
            .map(|path| ConverterError::FileNotFound(path.display().to_string()))
    }
}

/// Resolve command-line inputs into files, keeping their order.
///
/// Directories are searched recursively for `.mov` files (any case), sorted by path.
pub fn collect_inputs(paths: &[PathBuf]) -> InputSelection {
    let mut selection = InputSelection::default();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_mov(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            debug!("Found {} MOV files in {}", found.len(), path.display());
            selection.files.extend(found);
        } else if path.is_file() {
            selection.files.push(path.clone());
        } else {
            selection.missing.push(path.clone());
        }
    }

    selection
}

pub fn is_mov(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
        .unwrap_or(false)
}

/// File size in megabytes, 0 when it cannot be read.
pub fn file_size_mb(path: &Path) -> f64 {
    std::fs::metadata(path)
        .map(|m| m.len() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_is_mov_ignores_case() {
        assert!(is_mov(Path::new("clip.mov")));
        assert!(is_mov(Path::new("/a/CLIP.MOV")));
        assert!(!is_mov(Path::new("clip.mp4")));
        assert!(!is_mov(Path::new("mov")));
    }

    #[test]
    fn test_collect_keeps_order_and_reports_missing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("b.mov").touch().unwrap();
        temp.child("a.MOV").touch().unwrap();

        let inputs = vec![
            temp.path().join("b.mov"),
            temp.path().join("gone.mov"),
            temp.path().join("a.MOV"),
        ];
        let selection = collect_inputs(&inputs);

        assert_eq!(selection.files, vec![temp.path().join("b.mov"), temp.path().join("a.MOV")]);
        assert_eq!(selection.missing, vec![temp.path().join("gone.mov")]);

        let reports: Vec<String> = selection.missing_errors().map(|e| e.to_string()).collect();
        assert_eq!(
            reports,
            vec![format!("File not found: {}", temp.path().join("gone.mov").display())]
        );
    }

    #[test]
    fn test_directory_expands_to_sorted_mov_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("shoot/02.mov").touch().unwrap();
        temp.child("shoot/01.MOV").touch().unwrap();
        temp.child("shoot/notes.txt").touch().unwrap();
        temp.child("shoot/day2/03.mov").touch().unwrap();

        let selection = collect_inputs(&[temp.path().join("shoot")]);

        assert_eq!(
            selection.files,
            vec![
                temp.path().join("shoot/01.MOV"),
                temp.path().join("shoot/02.mov"),
                temp.path().join("shoot/day2/03.mov"),
            ]
        );
        assert!(selection.missing.is_empty());
    }

    #[test]
    fn test_file_size_mb() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("clip.mov");
        file.write_binary(&vec![0u8; 1024 * 1024]).unwrap();

        assert_eq!(file_size_mb(file.path()), 1.0);
        assert_eq!(file_size_mb(&temp.path().join("missing.mov")), 0.0);
    }
}
