use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert MOV files (or directories of them) to MP4
    Convert {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (defaults to alongside each source file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Quality preset: high, medium, low or custom
        #[arg(short, long)]
        quality: Option<String>,

        /// Print the batch result as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Locate ffmpeg and show its version
    Check,

    /// List quality presets and their ffmpeg options
    Presets,

    /// Show the effective configuration
    Config {
        /// Write it to this file instead of printing it
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_arguments() {
        let args = Args::parse_from([
            "mov2mp4", "convert", "a.mov", "b.MOV", "--output", "/out", "--quality", "low",
        ]);
        match args.command {
            Commands::Convert { inputs, output, quality, json } => {
                assert_eq!(inputs, vec![PathBuf::from("a.mov"), PathBuf::from("b.MOV")]);
                assert_eq!(output, Some(PathBuf::from("/out")));
                assert_eq!(quality.as_deref(), Some("low"));
                assert!(!json);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_convert_requires_inputs() {
        assert!(Args::try_parse_from(["mov2mp4", "convert"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = Args::parse_from(["mov2mp4", "-v", "--config", "c.toml", "check"]);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(args.command, Commands::Check));
    }
}
