//! Target path naming: `<source dir>/<subfolder>/<prefix><stem>.jpg`.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::config::PrefixFormat;

/// EXIF date/time layout as written by cameras.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Compute the output path for `source`.
///
/// `subfolder` is relative to the source's directory; `prefix` is prepended
/// to the source's file stem verbatim.
pub fn target_path(source: &Path, subfolder: Option<&Path>, prefix: &str) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut target = dir.to_path_buf();
    if let Some(subfolder) = subfolder {
        target.push(subfolder);
    }
    target.push(format!("{prefix}{stem}.{OUTPUT_EXTENSION}"));
    target
}

/// Parse an EXIF capture timestamp such as `2019:07:14 10:22:31`.
///
/// Trailing sub-second or offset data after the first 19 characters is
/// ignored.
pub fn parse_capture_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim().trim_matches('"');
    let head = value.get(..19).unwrap_or(value);
    NaiveDateTime::parse_from_str(head, EXIF_DATETIME_FORMAT).ok()
}

/// Build the filename prefix for a capture time, including the `_` separator.
pub fn date_prefix(captured_at: &NaiveDateTime, format: PrefixFormat) -> String {
    format!("{}_", captured_at.format(format.pattern()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_path_defaults() {
        let target = target_path(Path::new("/photos/day1/photo1.raw"), None, "");
        assert_eq!(target, PathBuf::from("/photos/day1/photo1.jpg"));
    }

    #[test]
    fn test_target_path_with_subfolder_and_prefix() {
        let target = target_path(
            Path::new("/photos/day1/_DSC0870.NEF"),
            Some(Path::new("jpg")),
            "20190714_102231_",
        );
        assert_eq!(
            target,
            PathBuf::from("/photos/day1/jpg/20190714_102231__DSC0870.jpg")
        );
    }

    #[test]
    fn test_target_path_is_idempotent() {
        let source = Path::new("/photos/a.nef");
        let first = target_path(source, Some(Path::new("out")), "p_");
        let second = target_path(source, Some(Path::new("out")), "p_");
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_capture_time() {
        let time = parse_capture_time("2019:07:14 10:22:31").unwrap();
        assert_eq!(time.to_string(), "2019-07-14 10:22:31");

        // Sub-seconds and quoting are tolerated
        assert!(parse_capture_time("\"2019:07:14 10:22:31.45\"\n").is_some());
    }

    #[test]
    fn test_parse_capture_time_rejects_garbage() {
        assert!(parse_capture_time("").is_none());
        assert!(parse_capture_time("0000:00:00 00:00:00").is_none());
        assert!(parse_capture_time("yesterday").is_none());
    }

    #[test]
    fn test_prefix_formats() {
        let time = parse_capture_time("2019:07:14 10:22:31").unwrap();
        assert_eq!(date_prefix(&time, PrefixFormat::Compact), "20190714_102231_");
        assert_eq!(
            date_prefix(&time, PrefixFormat::Dashed),
            "2019-07-14_10.22.31_"
        );
    }

    #[test]
    fn test_prefixes_sort_chronologically() {
        let times = [
            "2018:12:31 23:59:59",
            "2019:01:01 00:00:00",
            "2019:01:01 09:05:00",
            "2019:10:02 08:00:00",
        ];
        for format in [PrefixFormat::Compact, PrefixFormat::Dashed] {
            let prefixes: Vec<String> = times
                .iter()
                .map(|t| date_prefix(&parse_capture_time(t).unwrap(), format))
                .collect();
            let mut sorted = prefixes.clone();
            sorted.sort();
            assert_eq!(prefixes, sorted);
        }
    }
}
