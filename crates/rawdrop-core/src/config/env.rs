//! `RAWDROP_*` environment overrides.
//!
//! Applied after CLI flags, so an environment variable wins over a flag that
//! sets the same value.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

use super::{Config, OverwritePolicy};

/// Environment variables understood by [`Config::apply_env_overrides`].
pub const ENV_VARS: &[&str] = &[
    "RAWDROP_ROOT",
    "RAWDROP_SUBFOLDER",
    "RAWDROP_BOX_SIZE",
    "RAWDROP_POLL_INTERVAL",
    "RAWDROP_OVERWRITE",
    "RAWDROP_DATE_PREFIX",
    "RAWDROP_RUN_ONCE",
    "RAWDROP_PARALLEL",
];

impl Config {
    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary lookup (used by tests).
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("RAWDROP_ROOT").filter(|v| !v.is_empty()) {
            self.watch.root = Some(PathBuf::from(root));
        }
        if let Some(subfolder) = lookup("RAWDROP_SUBFOLDER") {
            self.convert.subfolder = (!subfolder.is_empty()).then(|| PathBuf::from(subfolder));
        }
        if let Some(value) = lookup("RAWDROP_BOX_SIZE") {
            self.convert.box_size = parse_var("RAWDROP_BOX_SIZE", &value)?;
        }
        if let Some(value) = lookup("RAWDROP_POLL_INTERVAL") {
            self.watch.poll_interval_secs = parse_var("RAWDROP_POLL_INTERVAL", &value)?;
        }
        if let Some(value) = lookup("RAWDROP_OVERWRITE") {
            self.convert.overwrite = parse_var::<OverwritePolicy>("RAWDROP_OVERWRITE", &value)?;
        }
        if let Some(value) = lookup("RAWDROP_DATE_PREFIX") {
            self.convert.date_prefix = parse_bool("RAWDROP_DATE_PREFIX", &value)?;
        }
        if let Some(value) = lookup("RAWDROP_RUN_ONCE") {
            self.watch.run_once = parse_bool("RAWDROP_RUN_ONCE", &value)?;
        }
        if let Some(value) = lookup("RAWDROP_PARALLEL") {
            self.watch.parallel_workers = parse_var("RAWDROP_PARALLEL", &value)?;
        }
        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvError {
        var: var.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::EnvError {
            var: var.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup(&[
                ("RAWDROP_ROOT", "/mnt/card"),
                ("RAWDROP_SUBFOLDER", "jpg"),
                ("RAWDROP_BOX_SIZE", "2560"),
                ("RAWDROP_POLL_INTERVAL", "3"),
                ("RAWDROP_OVERWRITE", "first-cycle-only"),
                ("RAWDROP_DATE_PREFIX", "yes"),
                ("RAWDROP_RUN_ONCE", "1"),
                ("RAWDROP_PARALLEL", "4"),
            ]))
            .unwrap();

        assert_eq!(config.watch.root, Some(PathBuf::from("/mnt/card")));
        assert_eq!(config.convert.subfolder, Some(PathBuf::from("jpg")));
        assert_eq!(config.convert.box_size, 2560);
        assert_eq!(config.watch.poll_interval_secs, 3);
        assert_eq!(config.convert.overwrite, OverwritePolicy::FirstCycleOnly);
        assert!(config.convert.date_prefix);
        assert!(config.watch.run_once);
        assert_eq!(config.watch.parallel_workers, 4);
    }

    #[test]
    fn test_env_wins_over_existing_value() {
        let mut config = Config::default();
        // Simulates a value already set from a CLI flag
        config.convert.overwrite = OverwritePolicy::Always;
        config
            .apply_overrides_from(lookup(&[("RAWDROP_OVERWRITE", "skip")]))
            .unwrap();
        assert_eq!(config.convert.overwrite, OverwritePolicy::Skip);
    }

    #[test]
    fn test_empty_subfolder_clears() {
        let mut config = Config::default();
        config.convert.subfolder = Some(PathBuf::from("out"));
        config
            .apply_overrides_from(lookup(&[("RAWDROP_SUBFOLDER", "")]))
            .unwrap();
        assert_eq!(config.convert.subfolder, None);
    }

    #[test]
    fn test_unset_vars_leave_config_alone() {
        let mut config = Config::default();
        config.apply_overrides_from(lookup(&[])).unwrap();
        assert_eq!(config.convert.box_size, 1920);
        assert!(config.watch.root.is_none());
    }

    #[test]
    fn test_bad_value_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides_from(lookup(&[("RAWDROP_BOX_SIZE", "large")]))
            .unwrap_err();
        assert!(err.to_string().contains("RAWDROP_BOX_SIZE"));

        let err = config
            .apply_overrides_from(lookup(&[("RAWDROP_RUN_ONCE", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("RAWDROP_RUN_ONCE"));
    }
}
