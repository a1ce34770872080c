//! Raw-to-JPEG conversion pipeline.
//!
//! - **discovery**: Find raw files under the watch root
//! - **snapshot**: Diff consecutive scans
//! - **codec**: Decode raw files and encode JPEGs
//! - **resize**: Fit images into a square box
//! - **enhance**: Contrast enhancement
//! - **naming**: Output paths and capture-time prefixes
//! - **metadata**: Read and copy EXIF tags
//! - **job**: The per-file conversion state machine
//! - **watch**: The polling loop

pub mod codec;
pub mod discovery;
pub mod enhance;
pub mod job;
pub mod metadata;
pub mod naming;
pub mod resize;
pub mod snapshot;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use codec::{DcrawCodec, ImageCodec};
pub use discovery::DirectoryScanner;
pub use enhance::{AutoContrast, Enhancer};
pub use job::{ConversionJob, ConversionJobBuilder, ConversionSpec, Services};
pub use metadata::{ExifTool, MetadataService};
pub use snapshot::ScanSnapshot;
pub use watch::{WatchLoop, WatchOptions};
