//! Core data types reported by the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A stage of the per-file conversion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Decode,
    Resize,
    Enhance,
    Naming,
    Persist,
    MetadataCopy,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::Resize => "resize",
            Stage::Enhance => "enhance",
            Stage::Naming => "naming",
            Stage::Persist => "persist",
            Stage::MetadataCopy => "metadata-copy",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a job left its target untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The target already exists and the overwrite policy forbids replacing it
    Exists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Exists => f.write_str("exists"),
        }
    }
}

/// The result of executing one conversion job.
///
/// Displayed as `SAVED(target)`, `SKIPPED(target, reason=exists)` or
/// `FAILED(stage, cause)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Saved {
        source: PathBuf,
        target: PathBuf,
    },
    Skipped {
        source: PathBuf,
        target: PathBuf,
        reason: SkipReason,
    },
    Failed {
        source: PathBuf,
        stage: Stage,
        cause: String,
    },
}

impl JobOutcome {
    /// The raw file this outcome belongs to.
    pub fn source(&self) -> &Path {
        match self {
            JobOutcome::Saved { source, .. }
            | JobOutcome::Skipped { source, .. }
            | JobOutcome::Failed { source, .. } => source,
        }
    }

    /// The target path, if the job got far enough to have a final one.
    pub fn target(&self) -> Option<&Path> {
        match self {
            JobOutcome::Saved { target, .. } | JobOutcome::Skipped { target, .. } => Some(target),
            JobOutcome::Failed { .. } => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, JobOutcome::Saved { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, JobOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobOutcome::Failed { .. })
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Saved { target, .. } => write!(f, "SAVED({})", target.display()),
            JobOutcome::Skipped { target, reason, .. } => {
                write!(f, "SKIPPED({}, reason={})", target.display(), reason)
            }
            JobOutcome::Failed { stage, cause, .. } => write!(f, "FAILED({}, {})", stage, cause),
        }
    }
}

/// Totals accumulated over a watch session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchSummary {
    /// Number of completed scan cycles
    pub cycles: u64,
    /// Jobs that wrote a JPEG
    pub saved: u64,
    /// Jobs skipped because the target existed
    pub skipped: u64,
    /// Jobs that failed at some stage
    pub failed: u64,
    /// Wall-clock time the watcher ran
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl WatchSummary {
    /// Count a single job outcome.
    pub fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Saved { .. } => self.saved += 1,
            JobOutcome::Skipped { .. } => self.skipped += 1,
            JobOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Total jobs dispatched.
    pub fn dispatched(&self) -> u64 {
        self.saved + self.skipped + self.failed
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
