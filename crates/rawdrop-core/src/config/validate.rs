//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// Largest side a JPEG can hold.
const MAX_BOX_SIZE: u32 = 65_535;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "watch.poll_interval_secs must be > 0".into(),
            ));
        }
        if self.watch.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "watch.parallel_workers must be > 0".into(),
            ));
        }
        if self.watch.raw_extensions.is_empty()
            || self.watch.raw_extensions.iter().any(|e| e.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "watch.raw_extensions must list at least one non-empty extension".into(),
            ));
        }
        if self.convert.box_size > MAX_BOX_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "convert.box_size must be at most {MAX_BOX_SIZE} (0 disables resizing)"
            )));
        }
        if self.convert.jpeg_quality == 0 || self.convert.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "convert.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if let Some(subfolder) = &self.convert.subfolder {
            if subfolder.is_absolute() {
                return Err(ConfigError::ValidationError(
                    "convert.subfolder must be a relative path".into(),
                ));
            }
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.metadata_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.metadata_timeout_ms must be > 0".into(),
            ));
        }
        if self.metadata.timestamp_tag.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "metadata.timestamp_tag must not be empty".into(),
            ));
        }
        Ok(())
    }
}
