//! Sub-configuration structs and the enums they carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Watch loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Root directory to watch (supports `~`)
    pub root: Option<PathBuf>,

    /// Seconds to sleep between scan cycles
    pub poll_interval_secs: u64,

    /// Run a single scan cycle and exit
    pub run_once: bool,

    /// Maximum jobs converted concurrently within one cycle
    pub parallel_workers: usize,

    /// Raw file extensions to pick up (case-insensitive, without dot)
    pub raw_extensions: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            root: None,
            poll_interval_secs: 10,
            run_once: false,
            parallel_workers: 1,
            raw_extensions: vec!["nef".to_string()],
        }
    }
}

/// Per-file conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Side of the square box the output must fit in; 0 disables resizing
    pub box_size: u32,

    /// Apply contrast enhancement
    pub enhance: bool,

    /// What to do when the target JPEG already exists
    pub overwrite: OverwritePolicy,

    /// Subfolder (relative to each source's directory) for outputs
    pub subfolder: Option<PathBuf>,

    /// Prefix output names with the capture timestamp
    pub date_prefix: bool,

    /// Timestamp layout used for the prefix
    pub prefix_format: PrefixFormat,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// Delete the written JPEG when copying metadata onto it fails
    pub remove_partial_output: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            box_size: 1920,
            enhance: true,
            overwrite: OverwritePolicy::Skip,
            subfolder: None,
            date_prefix: false,
            prefix_format: PrefixFormat::Compact,
            jpeg_quality: 90,
            remove_partial_output: true,
        }
    }
}

impl ConvertConfig {
    /// The resize box, or `None` when resizing is disabled.
    pub fn box_size(&self) -> Option<u32> {
        (self.box_size > 0).then_some(self.box_size)
    }
}

/// Time limits for external collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Raw decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Timeout for a single metadata tool invocation in milliseconds
    pub metadata_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            decode_timeout_ms: 60_000,
            metadata_timeout_ms: 15_000,
        }
    }
}

/// Raw decoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Path to the `dcraw` executable
    pub dcraw_path: String,

    /// Use the white balance recorded by the camera
    pub use_camera_wb: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            dcraw_path: "dcraw".to_string(),
            use_camera_wb: true,
        }
    }
}

/// Metadata tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Path to the `exiftool` executable
    pub exiftool_path: String,

    /// Tag holding the original capture time
    pub timestamp_tag: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            exiftool_path: "exiftool".to_string(),
            timestamp_tag: "DateTimeOriginal".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Rule governing whether an existing target blocks reprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Never replace an existing target
    #[default]
    Skip,
    /// Always replace existing targets
    Always,
    /// Replace during the first cycle after watcher start, skip afterwards
    FirstCycleOnly,
}

impl OverwritePolicy {
    /// Whether a cycle may overwrite, given whether it is the first cycle of
    /// the session.
    pub fn allows_overwrite(&self, first_cycle: bool) -> bool {
        match self {
            OverwritePolicy::Skip => false,
            OverwritePolicy::Always => true,
            OverwritePolicy::FirstCycleOnly => first_cycle,
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverwritePolicy::Skip => write!(f, "skip"),
            OverwritePolicy::Always => write!(f, "always"),
            OverwritePolicy::FirstCycleOnly => write!(f, "first-cycle-only"),
        }
    }
}

impl FromStr for OverwritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "always" => Ok(Self::Always),
            "first-cycle-only" | "first_cycle_only" => Ok(Self::FirstCycleOnly),
            other => Err(format!(
                "unknown overwrite policy '{other}' (expected skip, always or first-cycle-only)"
            )),
        }
    }
}

/// Layout of the capture-timestamp filename prefix.
///
/// Both layouts sort lexicographically in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixFormat {
    /// `YYYYMMDD_HHMMSS`
    #[default]
    Compact,
    /// `YYYY-MM-DD_HH.MM.SS`
    Dashed,
}

impl PrefixFormat {
    /// `chrono` format string for this layout.
    pub fn pattern(&self) -> &'static str {
        match self {
            PrefixFormat::Compact => "%Y%m%d_%H%M%S",
            PrefixFormat::Dashed => "%Y-%m-%d_%H.%M.%S",
        }
    }
}

impl FromStr for PrefixFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "dashed" => Ok(Self::Dashed),
            other => Err(format!(
                "unknown prefix format '{other}' (expected compact or dashed)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_policy_parse() {
        assert_eq!("skip".parse(), Ok(OverwritePolicy::Skip));
        assert_eq!("ALWAYS".parse(), Ok(OverwritePolicy::Always));
        assert_eq!(
            "first-cycle-only".parse(),
            Ok(OverwritePolicy::FirstCycleOnly)
        );
        assert!("sometimes".parse::<OverwritePolicy>().is_err());
    }

    #[test]
    fn test_overwrite_policy_allows() {
        assert!(!OverwritePolicy::Skip.allows_overwrite(true));
        assert!(OverwritePolicy::Always.allows_overwrite(false));
        assert!(OverwritePolicy::FirstCycleOnly.allows_overwrite(true));
        assert!(!OverwritePolicy::FirstCycleOnly.allows_overwrite(false));
    }

    #[test]
    fn test_box_size_zero_disables_resize() {
        let mut config = ConvertConfig::default();
        assert_eq!(config.box_size(), Some(1920));
        config.box_size = 0;
        assert_eq!(config.box_size(), None);
    }
}
