//! Rawdrop Core - watch a folder and turn camera raw files into JPEGs.
//!
//! Rawdrop polls a directory tree for raw files. Every newly appeared file is
//! converted once into a JPEG next to it (or in a subfolder), optionally
//! resized into a square box, contrast-enhanced and named after its capture
//! time. Metadata is carried over from the raw file.
//!
//! # Architecture
//!
//! ```text
//! Scan → Diff → Job: (Name) → Exists? → Decode → Resize → Enhance → Persist → Copy EXIF
//! ```
//!
//! Raw decoding and metadata access are delegated to `dcraw` and `exiftool`
//! behind the [`ImageCodec`](pipeline::ImageCodec) and
//! [`MetadataService`](pipeline::MetadataService) traits.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rawdrop_core::{Config, Rawdrop};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> rawdrop_core::Result<()> {
//!     let config = Config::load()?;
//!     let rawdrop = Rawdrop::new(config)?;
//!
//!     let summary = rawdrop
//!         .watcher()?
//!         .run(CancellationToken::new(), |outcome| println!("{outcome}"))
//!         .await;
//!     println!("{} saved", summary.saved);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

use std::path::Path;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, JobError, JobResult, RawdropError, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{ConversionJob, ConversionSpec, Services, WatchLoop, WatchOptions};
pub use types::{JobOutcome, SkipReason, Stage, WatchSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entry point tying a validated configuration to the external tools.
pub struct Rawdrop {
    config: Config,
    spec: ConversionSpec,
    services: Services,
}

impl Rawdrop {
    /// Create an instance backed by `dcraw` and `exiftool`.
    pub fn new(config: Config) -> Result<Self> {
        let services = Services::from_config(&config);
        Self::with_services(config, services)
    }

    /// Create an instance with custom codec, enhancer and metadata services.
    pub fn with_services(config: Config, services: Services) -> Result<Self> {
        config.check()?;
        tracing::debug!("Initializing Rawdrop v{}", VERSION);
        let spec = ConversionSpec::from_config(&config);
        Ok(Self {
            config,
            spec,
            services,
        })
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn spec(&self) -> &ConversionSpec {
        &self.spec
    }

    /// Build the watch loop for the configured root.
    pub fn watcher(&self) -> Result<WatchLoop> {
        let options = WatchOptions::from_config(&self.config)?;
        WatchLoop::new(options, self.spec.clone(), self.services.clone())
    }

    /// Convert a single raw file outside the watch loop.
    pub async fn convert(&self, source: &Path) -> JobOutcome {
        ConversionJob::builder(source)
            .spec(self.spec.clone())
            .build()
            .execute(&self.services)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_rawdrop_new() {
        let rawdrop = Rawdrop::new(Config::default()).unwrap();
        assert_eq!(rawdrop.config().watch.parallel_workers, 1);
        assert_eq!(rawdrop.spec().box_size, Some(1920));
    }

    #[test]
    fn test_rawdrop_rejects_invalid_config() {
        let mut config = Config::default();
        config.watch.poll_interval_secs = 0;
        assert!(matches!(
            Rawdrop::new(config),
            Err(RawdropError::Config(ConfigError::ValidationError(_)))
        ));
    }

    #[test]
    fn test_watcher_needs_root() {
        let rawdrop = Rawdrop::new(Config::default()).unwrap();
        assert!(matches!(
            rawdrop.watcher(),
            Err(RawdropError::InvalidRoot { .. })
        ));
    }
}
