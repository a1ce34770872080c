//! Raw decoding and JPEG encoding.
//!
//! Decoding shells out to `dcraw`, which writes a PPM stream to stdout that
//! the `image` crate reads back. Encoding uses the `image` crate's JPEG
//! encoder and writes through a temporary sibling so a target path never
//! holds a half-written file.

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::{DecoderConfig, LimitsConfig};
use crate::error::{JobError, JobResult};
use crate::types::Stage;

/// Decodes raw files and persists pixel buffers as JPEG.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// Decode the raw file at `path` into a pixel buffer.
    async fn decode(&self, path: &Path) -> JobResult<DynamicImage>;

    /// Encode `image` as a JPEG at `target`.
    ///
    /// With `replace` false an existing target is left untouched and
    /// [`JobError::TargetExists`] is returned.
    async fn encode(&self, image: DynamicImage, target: &Path, replace: bool) -> JobResult<()>;
}

/// [`ImageCodec`] backed by the `dcraw` command-line decoder.
pub struct DcrawCodec {
    dcraw_path: String,
    use_camera_wb: bool,
    decode_timeout_ms: u64,
    jpeg_quality: u8,
}

impl DcrawCodec {
    pub fn new(decoder: &DecoderConfig, limits: &LimitsConfig, jpeg_quality: u8) -> Self {
        Self {
            dcraw_path: decoder.dcraw_path.clone(),
            use_camera_wb: decoder.use_camera_wb,
            decode_timeout_ms: limits.decode_timeout_ms,
            jpeg_quality,
        }
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.dcraw_path);
        // -c: write to stdout
        cmd.arg("-c");
        if self.use_camera_wb {
            cmd.arg("-w");
        }
        cmd.arg(path).kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ImageCodec for DcrawCodec {
    async fn decode(&self, path: &Path) -> JobResult<DynamicImage> {
        let timeout_duration = Duration::from_millis(self.decode_timeout_ms);

        let output = match timeout(timeout_duration, self.command(path).output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(JobError::Decode {
                    path: path.to_path_buf(),
                    message: format!("Cannot run {}: {}", self.dcraw_path, e),
                })
            }
            Err(_) => {
                return Err(JobError::Timeout {
                    path: path.to_path_buf(),
                    stage: Stage::Decode,
                    timeout_ms: self.decode_timeout_ms,
                })
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(JobError::Decode {
                path: path.to_path_buf(),
                message: format!(
                    "{} exited with {}: {}",
                    self.dcraw_path,
                    output.status,
                    stderr.trim()
                ),
            });
        }

        let path_owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || decode_pnm(&output.stdout, &path_owned))
            .await
            .map_err(|e| JobError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            })?
    }

    async fn encode(&self, image: DynamicImage, target: &Path, replace: bool) -> JobResult<()> {
        let target_owned = target.to_path_buf();
        let quality = self.jpeg_quality;
        tokio::task::spawn_blocking(move || {
            write_jpeg(&image, &target_owned, quality, replace)
        })
        .await
        .map_err(|e| JobError::Encode {
            path: target.to_path_buf(),
            message: format!("Task join error: {}", e),
        })?
    }
}

/// Decode a PNM (PPM/PGM) byte stream.
pub fn decode_pnm(bytes: &[u8], path: &Path) -> JobResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(JobError::Decode {
            path: path.to_path_buf(),
            message: "decoder produced no image data".to_string(),
        });
    }
    image::load_from_memory_with_format(bytes, ImageFormat::Pnm).map_err(|e| JobError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write `image` as a JPEG at `target`.
///
/// The data goes to a uniquely named `.part` sibling first, so concurrent
/// writers never share a temporary file. With `replace` false the finished
/// file is published without clobbering: if `target` appeared meanwhile the
/// temporary file is discarded and [`JobError::TargetExists`] is returned.
pub fn write_jpeg(
    image: &DynamicImage,
    target: &Path,
    quality: u8,
    replace: bool,
) -> JobResult<()> {
    let encode_err = |message: String| JobError::Encode {
        path: target.to_path_buf(),
        message,
    };

    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Dropping `partial` before it is persisted removes it from disk
    let mut partial = tempfile::Builder::new()
        .prefix(&format!(".{stem}."))
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| encode_err(e.to_string()))?;

    {
        let mut writer = BufWriter::new(partial.as_file_mut());
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
        image
            .to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| encode_err(e.to_string()))?;
        writer.flush().map_err(|e| encode_err(e.to_string()))?;
    }

    let published = if replace {
        partial.persist(target)
    } else {
        partial.persist_noclobber(target)
    };
    match published {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Err(JobError::TargetExists {
            path: target.to_path_buf(),
        }),
        Err(e) => Err(encode_err(e.error.to_string())),
    }
}
