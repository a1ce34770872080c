//! Conversion flags shared by `watch` and `convert`.

use clap::Args;
use rawdrop_core::Config;
use std::path::PathBuf;

use super::types::{Overwrite, PrefixStyle};

/// Per-file conversion options. Unset flags keep the config file's value.
#[derive(Args, Debug, Default, Clone)]
pub struct ConversionArgs {
    /// Write JPEGs into this folder, relative to each raw file's directory
    #[arg(short, long)]
    pub subfolder: Option<PathBuf>,

    /// Fit output into a square of this many pixels
    #[arg(short, long)]
    pub box_size: Option<u32>,

    /// Keep the decoded size
    #[arg(long, conflicts_with = "box_size")]
    pub no_resize: bool,

    /// When an existing JPEG may be replaced
    #[arg(short, long, value_enum)]
    pub overwrite: Option<Overwrite>,

    /// Prefix output names with the capture time
    #[arg(short, long)]
    pub date_prefix: bool,

    /// Layout of the capture-time prefix
    #[arg(long, value_enum)]
    pub prefix_format: Option<PrefixStyle>,

    /// Disable contrast enhancement
    #[arg(long)]
    pub no_enhance: bool,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,
}

impl ConversionArgs {
    /// Layer these flags over `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(subfolder) = &self.subfolder {
            config.convert.subfolder = Some(subfolder.clone());
        }
        if let Some(box_size) = self.box_size {
            config.convert.box_size = box_size;
        }
        if self.no_resize {
            config.convert.box_size = 0;
        }
        if let Some(overwrite) = self.overwrite {
            config.convert.overwrite = overwrite.into();
        }
        if self.date_prefix {
            config.convert.date_prefix = true;
        }
        if let Some(style) = self.prefix_format {
            config.convert.prefix_format = style.into();
        }
        if self.no_enhance {
            config.convert.enhance = false;
        }
        if let Some(quality) = self.quality {
            config.convert.jpeg_quality = quality;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawdrop_core::config::{OverwritePolicy, PrefixFormat};

    #[test]
    fn test_unset_flags_keep_config() {
        let mut config = Config::default();
        config.convert.box_size = 1024;
        config.convert.overwrite = OverwritePolicy::Always;

        ConversionArgs::default().apply(&mut config);

        assert_eq!(config.convert.box_size, 1024);
        assert_eq!(config.convert.overwrite, OverwritePolicy::Always);
        assert!(config.convert.enhance);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let args = ConversionArgs {
            subfolder: Some(PathBuf::from("jpg")),
            box_size: Some(800),
            overwrite: Some(Overwrite::FirstCycleOnly),
            date_prefix: true,
            prefix_format: Some(PrefixStyle::Dashed),
            no_enhance: true,
            quality: Some(75),
            ..ConversionArgs::default()
        };
        args.apply(&mut config);

        assert_eq!(config.convert.subfolder, Some(PathBuf::from("jpg")));
        assert_eq!(config.convert.box_size(), Some(800));
        assert_eq!(config.convert.overwrite, OverwritePolicy::FirstCycleOnly);
        assert!(config.convert.date_prefix);
        assert_eq!(config.convert.prefix_format, PrefixFormat::Dashed);
        assert!(!config.convert.enhance);
        assert_eq!(config.convert.jpeg_quality, 75);
    }

    #[test]
    fn test_no_resize_disables_box() {
        let mut config = Config::default();
        let args = ConversionArgs {
            no_resize: true,
            ..ConversionArgs::default()
        };
        args.apply(&mut config);
        assert_eq!(config.convert.box_size(), None);
    }
}
