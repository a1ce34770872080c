//! Metadata access through the `exiftool` command-line tool.

use async_trait::async_trait;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::{LimitsConfig, MetadataConfig};
use crate::error::{JobError, JobResult};

/// Reads and copies image metadata.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Read a single tag from `path`. Fails if the tag is absent.
    async fn read_tag(&self, path: &Path, tag: &str) -> JobResult<String>;

    /// Copy all tags except orientation from `source` onto `target`, in place.
    ///
    /// Orientation is left out because decoding already rotates the pixels.
    async fn copy_tags(&self, source: &Path, target: &Path) -> JobResult<()>;
}

/// [`MetadataService`] backed by `exiftool`.
///
/// Every call is a separate short-lived process, so concurrent jobs never
/// share state.
pub struct ExifTool {
    exiftool_path: String,
    timeout_ms: u64,
}

impl ExifTool {
    pub fn new(config: &MetadataConfig, limits: &LimitsConfig) -> Self {
        Self {
            exiftool_path: config.exiftool_path.clone(),
            timeout_ms: limits.metadata_timeout_ms,
        }
    }

    async fn run(&self, mut cmd: Command) -> Result<Output, String> {
        cmd.kill_on_drop(true);
        match timeout(Duration::from_millis(self.timeout_ms), cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(format!("Cannot run {}: {}", self.exiftool_path, e)),
            Err(_) => Err(format!(
                "{} did not finish within {}ms",
                self.exiftool_path, self.timeout_ms
            )),
        }
    }
}

#[async_trait]
impl MetadataService for ExifTool {
    async fn read_tag(&self, path: &Path, tag: &str) -> JobResult<String> {
        let read_err = |message: String| JobError::MetadataRead {
            path: path.to_path_buf(),
            tag: tag.to_string(),
            message,
        };

        let mut cmd = Command::new(&self.exiftool_path);
        // -s3: print the bare value only
        cmd.arg("-s3").arg(format!("-{tag}")).arg(path);

        let output = self.run(cmd).await.map_err(read_err)?;
        if !output.status.success() {
            return Err(read_err(describe_failure(&output)));
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            return Err(read_err("tag not present".to_string()));
        }
        Ok(value)
    }

    async fn copy_tags(&self, source: &Path, target: &Path) -> JobResult<()> {
        let mut cmd = Command::new(&self.exiftool_path);
        cmd.arg("-q")
            .arg("-overwrite_original")
            .arg("-TagsFromFile")
            .arg(source)
            .arg("-all:all")
            .arg("--Orientation")
            .arg(target);

        let copy_err = |message: String| JobError::MetadataCopy {
            source_path: source.to_path_buf(),
            target: target.to_path_buf(),
            message,
        };

        let output = self.run(cmd).await.map_err(copy_err)?;
        if !output.status.success() {
            return Err(copy_err(describe_failure(&output)));
        }
        tracing::trace!("Copied metadata {:?} -> {:?}", source, target);
        Ok(())
    }
}

fn describe_failure(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        format!("exited with {}: {}", output.status, stderr)
    }
}
