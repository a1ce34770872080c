//! The per-file conversion job.
//!
//! A job is configured through [`ConversionJobBuilder`], frozen by `build()`,
//! and consumed by [`ConversionJob::execute`], so it runs at most once and
//! cannot be reconfigured mid-flight. Stages run strictly in order:
//!
//! ```text
//! (naming) → existence check → decode → resize → enhance → persist → metadata copy
//! ```
//!
//! Naming runs first only when date-prefix naming is on, so the existence
//! check looks at the final target.

use image::GenericImageView;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, OverwritePolicy, PrefixFormat};
use crate::error::{JobError, JobResult};
use crate::types::{JobOutcome, SkipReason};

use super::codec::{DcrawCodec, ImageCodec};
use super::enhance::{AutoContrast, Enhancer};
use super::metadata::{ExifTool, MetadataService};
use super::naming;
use super::resize::resize_to_box;

/// Conversion settings shared by every job of a session.
#[derive(Debug, Clone)]
pub struct ConversionSpec {
    /// Fit the output into a square of this side
    pub box_size: Option<u32>,
    /// Run the enhancer
    pub enhance: bool,
    /// Overwrite policy for existing targets
    pub overwrite: OverwritePolicy,
    /// Output subfolder relative to the source directory
    pub subfolder: Option<PathBuf>,
    /// Prefix names with the capture timestamp
    pub date_prefix: bool,
    /// Layout of that prefix
    pub prefix_format: PrefixFormat,
    /// Tag the capture timestamp is read from
    pub timestamp_tag: String,
    /// Delete the JPEG when the metadata copy fails
    pub remove_partial_output: bool,
}

impl Default for ConversionSpec {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ConversionSpec {
    pub fn from_config(config: &Config) -> Self {
        Self {
            box_size: config.convert.box_size(),
            enhance: config.convert.enhance,
            overwrite: config.convert.overwrite,
            subfolder: config.convert.subfolder.clone(),
            date_prefix: config.convert.date_prefix,
            prefix_format: config.convert.prefix_format,
            timestamp_tag: config.metadata.timestamp_tag.clone(),
            remove_partial_output: config.convert.remove_partial_output,
        }
    }
}

/// The external collaborators a job talks to.
#[derive(Clone)]
pub struct Services {
    pub codec: Arc<dyn ImageCodec>,
    pub enhancer: Arc<dyn Enhancer>,
    pub metadata: Arc<dyn MetadataService>,
}

impl Services {
    pub fn new(
        codec: Arc<dyn ImageCodec>,
        enhancer: Arc<dyn Enhancer>,
        metadata: Arc<dyn MetadataService>,
    ) -> Self {
        Self {
            codec,
            enhancer,
            metadata,
        }
    }

    /// `dcraw` decoding, auto-contrast enhancement and `exiftool` metadata.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(DcrawCodec::new(
                &config.decoder,
                &config.limits,
                config.convert.jpeg_quality,
            )),
            Arc::new(AutoContrast::default()),
            Arc::new(ExifTool::new(&config.metadata, &config.limits)),
        )
    }
}

/// Builder for a [`ConversionJob`].
#[derive(Debug, Clone)]
pub struct ConversionJobBuilder {
    source: PathBuf,
    spec: ConversionSpec,
    first_cycle: bool,
}

impl ConversionJobBuilder {
    /// Replace the whole spec.
    pub fn spec(mut self, spec: ConversionSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn box_size(mut self, box_size: Option<u32>) -> Self {
        self.spec.box_size = box_size;
        self
    }

    pub fn enhance(mut self, enhance: bool) -> Self {
        self.spec.enhance = enhance;
        self
    }

    pub fn overwrite(mut self, overwrite: OverwritePolicy) -> Self {
        self.spec.overwrite = overwrite;
        self
    }

    pub fn subfolder(mut self, subfolder: Option<PathBuf>) -> Self {
        self.spec.subfolder = subfolder;
        self
    }

    pub fn date_prefix(mut self, date_prefix: bool) -> Self {
        self.spec.date_prefix = date_prefix;
        self
    }

    pub fn prefix_format(mut self, prefix_format: PrefixFormat) -> Self {
        self.spec.prefix_format = prefix_format;
        self
    }

    /// Whether the job belongs to the first cycle of a watch session.
    ///
    /// Only matters for [`OverwritePolicy::FirstCycleOnly`]. Defaults to true.
    pub fn first_cycle(mut self, first_cycle: bool) -> Self {
        self.first_cycle = first_cycle;
        self
    }

    /// Freeze the configuration.
    pub fn build(self) -> ConversionJob {
        let target = naming::target_path(&self.source, self.spec.subfolder.as_deref(), "");
        let allow_overwrite = self.spec.overwrite.allows_overwrite(self.first_cycle);
        ConversionJob {
            source: self.source,
            spec: self.spec,
            allow_overwrite,
            target,
        }
    }
}

/// One source file's conversion, ready to run.
#[derive(Debug)]
pub struct ConversionJob {
    source: PathBuf,
    spec: ConversionSpec,
    allow_overwrite: bool,
    target: PathBuf,
}

impl ConversionJob {
    pub fn builder(source: impl Into<PathBuf>) -> ConversionJobBuilder {
        ConversionJobBuilder {
            source: source.into(),
            spec: ConversionSpec::default(),
            first_cycle: true,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Target path before any date prefix is applied.
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn spec(&self) -> &ConversionSpec {
        &self.spec
    }

    /// Whether an existing target will be replaced.
    pub fn allows_overwrite(&self) -> bool {
        self.allow_overwrite
    }

    /// Run the pipeline. Never panics on job-level failures; they come back
    /// as [`JobOutcome::Failed`].
    pub async fn execute(self, services: &Services) -> JobOutcome {
        let start = Instant::now();
        let outcome = match self.run(services).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Failed: {:?} - {}", self.source, e);
                JobOutcome::Failed {
                    source: self.source.clone(),
                    stage: e.stage(),
                    cause: e.to_string(),
                }
            }
        };
        tracing::debug!("{:?} finished in {:?}: {}", self.source, start.elapsed(), outcome);
        outcome
    }

    async fn run(&self, services: &Services) -> JobResult<JobOutcome> {
        let target = if self.spec.date_prefix {
            let naming_start = Instant::now();
            let prefix = self.resolve_prefix(services).await?;
            tracing::trace!("  Naming: {:?}", naming_start.elapsed());
            naming::target_path(&self.source, self.spec.subfolder.as_deref(), &prefix)
        } else {
            self.target.clone()
        };

        if !self.allow_overwrite && self.target_exists(&target).await? {
            return Ok(self.skipped(target));
        }

        // Decode
        let decode_start = Instant::now();
        let mut image = services.codec.decode(&self.source).await?;
        let (width, height) = image.dimensions();
        tracing::trace!("  Decode: {:?} ({}x{})", decode_start.elapsed(), width, height);

        // Resize
        if let Some(box_size) = self.spec.box_size {
            let resize_start = Instant::now();
            image = tokio::task::spawn_blocking(move || resize_to_box(image, box_size))
                .await
                .map_err(|e| JobError::Resize {
                    path: self.source.clone(),
                    message: format!("Task join error: {}", e),
                })?;
            tracing::trace!("  Resize: {:?}", resize_start.elapsed());
        }

        // Enhance
        if self.spec.enhance {
            let enhance_start = Instant::now();
            let enhancer = services.enhancer.clone();
            image = tokio::task::spawn_blocking(move || enhancer.enhance(image))
                .await
                .map_err(|e| JobError::Enhance {
                    path: self.source.clone(),
                    message: format!("Task join error: {}", e),
                })?;
            tracing::trace!("  Enhance: {:?}", enhance_start.elapsed());
        }

        // Persist
        let persist_start = Instant::now();
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| JobError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        match services
            .codec
            .encode(image, &target, self.allow_overwrite)
            .await
        {
            Ok(()) => {}
            // A concurrent job for a source with the same target published first
            Err(JobError::TargetExists { .. }) => return Ok(self.skipped(target)),
            Err(e) => return Err(e),
        }
        tracing::trace!("  Persist: {:?}", persist_start.elapsed());

        // Metadata copy
        if let Err(e) = services.metadata.copy_tags(&self.source, &target).await {
            self.handle_partial_output(&target).await;
            return Err(e);
        }

        Ok(JobOutcome::Saved {
            source: self.source.clone(),
            target,
        })
    }

    /// Fails when the target's state cannot be determined, so an unknown
    /// target is never written.
    async fn target_exists(&self, target: &Path) -> JobResult<bool> {
        tokio::fs::try_exists(target)
            .await
            .map_err(|e| JobError::TargetState {
                path: target.to_path_buf(),
                source: e,
            })
    }

    fn skipped(&self, target: PathBuf) -> JobOutcome {
        JobOutcome::Skipped {
            source: self.source.clone(),
            target,
            reason: SkipReason::Exists,
        }
    }

    /// Read and format the capture-timestamp prefix. No fallback: a missing
    /// or malformed timestamp fails the job.
    async fn resolve_prefix(&self, services: &Services) -> JobResult<String> {
        let value = services
            .metadata
            .read_tag(&self.source, &self.spec.timestamp_tag)
            .await?;
        let captured_at =
            naming::parse_capture_time(&value).ok_or_else(|| JobError::TimestampParse {
                path: self.source.clone(),
                value: value.clone(),
            })?;
        Ok(naming::date_prefix(&captured_at, self.spec.prefix_format))
    }

    /// The JPEG is on disk but has no metadata. Either remove it so a later
    /// run converts the file again, or keep it and say so.
    async fn handle_partial_output(&self, target: &Path) {
        if self.spec.remove_partial_output {
            match tokio::fs::remove_file(target).await {
                Ok(()) => tracing::warn!(
                    "Removed {:?}: metadata copy failed, file will be converted again on the next run",
                    target
                ),
                Err(e) => tracing::warn!("Could not remove incomplete output {:?}: {}", target, e),
            }
        } else {
            tracing::warn!(
                "Kept {:?} without copied metadata; it will be skipped on later runs",
                target
            );
        }
    }
}
