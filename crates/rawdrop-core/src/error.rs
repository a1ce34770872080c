//! Error types for the rawdrop conversion pipeline.
//!
//! Job errors are organized by pipeline stage so that a failed conversion can
//! be reported as `FAILED(stage, cause)` without losing the file path.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Stage;

/// Top-level error type for rawdrop operations.
#[derive(Error, Debug)]
pub enum RawdropError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The watch root does not exist or is not usable
    #[error("Invalid watch root {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// An environment override could not be parsed
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    EnvError {
        var: String,
        value: String,
        reason: String,
    },

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Conversion job errors, one variant family per pipeline stage.
#[derive(Error, Debug)]
pub enum JobError {
    /// Raw decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// A stage did not finish within its time limit
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: Stage,
        timeout_ms: u64,
    },

    /// Resizing the decoded buffer failed
    #[error("Resize failed for {path}: {message}")]
    Resize { path: PathBuf, message: String },

    /// The enhancer failed
    #[error("Enhance failed for {path}: {message}")]
    Enhance { path: PathBuf, message: String },

    /// A metadata tag could not be read from the source
    #[error("Cannot read tag {tag} from {path}: {message}")]
    MetadataRead {
        path: PathBuf,
        tag: String,
        message: String,
    },

    /// The capture timestamp did not match the expected format
    #[error("Unparsable capture timestamp {value:?} in {path}")]
    TimestampParse { path: PathBuf, value: String },

    /// The target directory could not be created
    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Whether the target exists could not be determined
    #[error("Cannot check target {path}: {source}")]
    TargetState {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another writer published the target first and replacing it is not allowed
    #[error("Target {path} already exists")]
    TargetExists { path: PathBuf },

    /// JPEG encoding or writing failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Copying tags onto the written JPEG failed
    #[error("Metadata copy from {source_path} to {target} failed: {message}")]
    MetadataCopy {
        source_path: PathBuf,
        target: PathBuf,
        message: String,
    },
}

impl JobError {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            JobError::Decode { .. } => Stage::Decode,
            JobError::Timeout { stage, .. } => *stage,
            JobError::Resize { .. } => Stage::Resize,
            JobError::Enhance { .. } => Stage::Enhance,
            JobError::MetadataRead { .. } | JobError::TimestampParse { .. } => Stage::Naming,
            JobError::CreateDir { .. }
            | JobError::TargetState { .. }
            | JobError::TargetExists { .. }
            | JobError::Encode { .. } => Stage::Persist,
            JobError::MetadataCopy { .. } => Stage::MetadataCopy,
        }
    }
}

/// Convenience type alias for rawdrop results.
pub type Result<T> = std::result::Result<T, RawdropError>;

/// Convenience type alias for job-level results.
pub type JobResult<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        let err = JobError::TimestampParse {
            path: PathBuf::from("a.nef"),
            value: "garbage".into(),
        };
        assert_eq!(err.stage(), Stage::Naming);

        let err = JobError::Timeout {
            path: PathBuf::from("a.nef"),
            stage: Stage::Decode,
            timeout_ms: 10,
        };
        assert_eq!(err.stage(), Stage::Decode);
        assert!(err.to_string().contains("decode"));
    }

    #[test]
    fn test_target_errors_are_persist_stage() {
        let err = JobError::TargetState {
            path: PathBuf::from("/out/a.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.stage(), Stage::Persist);

        let err = JobError::TargetExists {
            path: PathBuf::from("/out/a.jpg"),
        };
        assert_eq!(err.stage(), Stage::Persist);
    }

    #[test]
    fn test_metadata_copy_message() {
        let err = JobError::MetadataCopy {
            source_path: PathBuf::from("/in/a.nef"),
            target: PathBuf::from("/in/a.jpg"),
            message: "exit status 1".into(),
        };
        assert_eq!(err.stage(), Stage::MetadataCopy);
        assert!(err.to_string().contains("/in/a.jpg"));
    }
}
