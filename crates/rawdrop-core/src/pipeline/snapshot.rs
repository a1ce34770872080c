//! Scan snapshots and the diff that drives dispatch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The set of raw files observed in one directory walk.
///
/// Only membership matters; iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSnapshot {
    paths: HashSet<PathBuf>,
}

impl ScanSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths present in `self` but not in `prior`.
    ///
    /// Files that disappeared since `prior` are ignored.
    pub fn newly_appeared(&self, prior: &ScanSnapshot) -> Vec<PathBuf> {
        self.paths.difference(&prior.paths).cloned().collect()
    }
}

impl FromIterator<PathBuf> for ScanSnapshot {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(names: &[&str]) -> ScanSnapshot {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_only_new_paths_are_reported() {
        let prior = snapshot(&["/in/A.nef", "/in/B.nef"]);
        let current = snapshot(&["/in/A.nef", "/in/B.nef", "/in/C.nef"]);

        let new = current.newly_appeared(&prior);
        assert_eq!(new, vec![PathBuf::from("/in/C.nef")]);
    }

    #[test]
    fn test_removed_paths_are_ignored() {
        let prior = snapshot(&["/in/A.nef", "/in/B.nef"]);
        let current = snapshot(&["/in/A.nef"]);
        assert!(current.newly_appeared(&prior).is_empty());
    }

    #[test]
    fn test_reappearance_counts_as_new() {
        let first = snapshot(&["/in/A.nef"]);
        let deleted = snapshot(&[]);
        let readded = snapshot(&["/in/A.nef"]);

        assert!(deleted.newly_appeared(&first).is_empty());
        assert_eq!(readded.newly_appeared(&deleted).len(), 1);
    }

    #[test]
    fn test_everything_is_new_against_empty() {
        let current = snapshot(&["/in/A.nef", "/in/B.nef"]);
        let mut new = current.newly_appeared(&ScanSnapshot::new());
        new.sort();
        assert_eq!(
            new,
            vec![PathBuf::from("/in/A.nef"), PathBuf::from("/in/B.nef")]
        );
    }
}
