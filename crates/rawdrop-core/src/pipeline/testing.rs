//! Test doubles for the capability traits.

use async_trait::async_trait;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::codec::{write_jpeg, ImageCodec};
use super::enhance::Enhancer;
use super::job::Services;
use super::metadata::MetadataService;
use crate::error::{JobError, JobResult};

/// Source files whose content is exactly this fail to decode.
pub const CORRUPT: &[u8] = b"corrupt";

/// Produces a synthetic image for any readable source and writes real JPEGs.
pub struct FakeCodec {
    pub width: u32,
    pub height: u32,
    pub decodes: AtomicUsize,
}

impl FakeCodec {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            decodes: AtomicUsize::new(0),
        }
    }

    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageCodec for FakeCodec {
    async fn decode(&self, path: &Path) -> JobResult<DynamicImage> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        let bytes = tokio::fs::read(path).await.map_err(|e| JobError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if bytes == CORRUPT {
            return Err(JobError::Decode {
                path: path.to_path_buf(),
                message: "corrupt raw data".to_string(),
            });
        }
        Ok(DynamicImage::new_rgb8(self.width, self.height))
    }

    async fn encode(&self, image: DynamicImage, target: &Path, replace: bool) -> JobResult<()> {
        write_jpeg(&image, target, 90, replace)
    }
}

/// Counts calls and returns the buffer unchanged.
#[derive(Default)]
pub struct CountingEnhancer {
    pub calls: AtomicUsize,
}

impl Enhancer for CountingEnhancer {
    fn enhance(&self, image: DynamicImage) -> DynamicImage {
        self.calls.fetch_add(1, Ordering::SeqCst);
        image
    }
}

/// Scripted metadata service.
#[derive(Default)]
pub struct FakeMetadata {
    pub timestamp: Option<String>,
    pub fail_copy: bool,
    pub copies: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl FakeMetadata {
    pub fn with_timestamp(value: &str) -> Self {
        Self {
            timestamp: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_copy() -> Self {
        Self {
            fail_copy: true,
            ..Self::default()
        }
    }

    pub fn copy_count(&self) -> usize {
        self.copies.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MetadataService for FakeMetadata {
    async fn read_tag(&self, path: &Path, tag: &str) -> JobResult<String> {
        self.timestamp.clone().ok_or_else(|| JobError::MetadataRead {
            path: path.to_path_buf(),
            tag: tag.to_string(),
            message: "tag not present".to_string(),
        })
    }

    async fn copy_tags(&self, source: &Path, target: &Path) -> JobResult<()> {
        if self.fail_copy {
            return Err(JobError::MetadataCopy {
                source_path: source.to_path_buf(),
                target: target.to_path_buf(),
                message: "exited with exit status: 1".to_string(),
            });
        }
        if let Ok(mut copies) = self.copies.lock() {
            copies.push((source.to_path_buf(), target.to_path_buf()));
        }
        Ok(())
    }
}

/// Handles to the fakes behind a [`Services`] bundle.
pub struct Fakes {
    pub codec: Arc<FakeCodec>,
    pub enhancer: Arc<CountingEnhancer>,
    pub metadata: Arc<FakeMetadata>,
}

impl Fakes {
    pub fn new(metadata: FakeMetadata) -> Self {
        Self {
            codec: Arc::new(FakeCodec::new(600, 400)),
            enhancer: Arc::new(CountingEnhancer::default()),
            metadata: Arc::new(metadata),
        }
    }

    pub fn services(&self) -> Services {
        Services::new(
            self.codec.clone(),
            self.enhancer.clone(),
            self.metadata.clone(),
        )
    }
}
