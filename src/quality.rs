use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Named encoding presets handed to ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Quality {
    /// Highest fidelity, larger output
    High,
    /// Balanced default
    #[default]
    Medium,
    /// Smallest output
    Low,
    /// Re-encode video, pass audio through untouched
    Custom,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::High, Quality::Medium, Quality::Low, Quality::Custom];

    /// Look up a preset by name. Unknown names fall back to `Medium`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "high" => Quality::High,
            "medium" => Quality::Medium,
            "low" => Quality::Low,
            "custom" => Quality::Custom,
            other => {
                warn!("Unknown quality '{}', using 'medium'", other);
                Quality::Medium
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
            Quality::Custom => "custom",
        }
    }

    /// Ordered ffmpeg option tokens: video codec, CRF, audio codec and bitrate.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Quality::High => &["-c:v", "libx264", "-crf", "18", "-c:a", "aac", "-b:a", "192k"],
            Quality::Medium => &["-c:v", "libx264", "-crf", "23", "-c:a", "aac", "-b:a", "128k"],
            Quality::Low => &["-c:v", "libx264", "-crf", "28", "-c:a", "aac", "-b:a", "96k"],
            Quality::Custom => &["-c:v", "libx264", "-crf", "20", "-c:a", "copy"],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Quality::High => "highest fidelity, larger output",
            Quality::Medium => "balanced default",
            Quality::Low => "smallest output, lowest fidelity",
            Quality::Custom => "re-encode video, copy audio unmodified",
        }
    }
}

impl From<String> for Quality {
    fn from(name: String) -> Self {
        Quality::from_name(&name)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(Quality::from_name("high"), Quality::High);
        assert_eq!(Quality::from_name("LOW"), Quality::Low);
        assert_eq!(Quality::from_name(" custom "), Quality::Custom);
        assert_eq!(Quality::from_name("medium"), Quality::Medium);
    }

    #[test]
    fn test_unknown_names_fall_back_to_medium() {
        let medium = Quality::Medium.options();
        for name in ["", "ultra", "hi", "mediu", "4k"] {
            assert_eq!(Quality::from_name(name).options(), medium, "name: {name:?}");
        }
    }

    #[test]
    fn test_custom_copies_audio() {
        let opts = Quality::Custom.options();
        let pos = opts.iter().position(|o| *o == "-c:a").unwrap();
        assert_eq!(opts[pos + 1], "copy");
        assert!(!opts.contains(&"-b:a"));
    }

    #[test]
    fn test_crf_orders_presets() {
        let crf = |q: Quality| {
            let opts = q.options();
            let pos = opts.iter().position(|o| *o == "-crf").unwrap();
            opts[pos + 1].parse::<u32>().unwrap()
        };
        assert!(crf(Quality::High) < crf(Quality::Medium));
        assert!(crf(Quality::Medium) < crf(Quality::Low));
    }

    #[test]
    fn test_name_round_trips() {
        for q in Quality::ALL {
            assert_eq!(Quality::from_name(q.name()), q);
        }
    }
}
