//! CLI enum types: overwrite policy, prefix layout, status format.

use clap::ValueEnum;
use rawdrop_core::config::{OverwritePolicy, PrefixFormat};
use rawdrop_core::OutputFormat as CoreOutputFormat;

/// When an existing JPEG may be replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Overwrite {
    /// Never replace an existing target
    Skip,
    /// Always reconvert and replace
    Always,
    /// Replace during the first scan cycle only
    FirstCycleOnly,
}

impl From<Overwrite> for OverwritePolicy {
    fn from(value: Overwrite) -> Self {
        match value {
            Overwrite::Skip => OverwritePolicy::Skip,
            Overwrite::Always => OverwritePolicy::Always,
            Overwrite::FirstCycleOnly => OverwritePolicy::FirstCycleOnly,
        }
    }
}

/// Layout of the capture-time name prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrefixStyle {
    /// 20190714_102231_
    Compact,
    /// 2019-07-14_10.22.31_
    Dashed,
}

impl From<PrefixStyle> for PrefixFormat {
    fn from(value: PrefixStyle) -> Self {
        match value {
            PrefixStyle::Compact => PrefixFormat::Compact,
            PrefixStyle::Dashed => PrefixFormat::Dashed,
        }
    }
}

/// Status line formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusFormat {
    /// One human-readable line per file
    #[default]
    Text,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<StatusFormat> for CoreOutputFormat {
    fn from(value: StatusFormat) -> Self {
        match value {
            StatusFormat::Text => CoreOutputFormat::Text,
            StatusFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for StatusFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFormat::Text => write!(f, "text"),
            StatusFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}
