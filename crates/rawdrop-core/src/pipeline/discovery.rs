//! Recursive discovery of raw files under a watch root.

use std::path::Path;
use walkdir::WalkDir;

use super::snapshot::ScanSnapshot;

/// Finds raw files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    /// Lowercased extensions, without the leading dot
    extensions: Vec<String>,
}

impl DirectoryScanner {
    /// Create a scanner matching the given extensions (case-insensitive).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Walk `root` and collect every matching regular file.
    ///
    /// Symlinks are not followed, so a looping tree cannot hang the walk.
    /// Entries that cannot be read are logged and skipped. If `root` is itself
    /// a matching file, the snapshot contains just that file.
    pub fn scan(&self, root: &Path) -> ScanSnapshot {
        let mut snapshot = ScanSnapshot::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string());
                    tracing::warn!(
                        "Skipping unreadable entry {}: {}",
                        path.as_deref().unwrap_or("<unknown>"),
                        e
                    );
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_supported(entry.path()) {
                snapshot.insert(entry.into_path());
            }
        }

        tracing::trace!("Scanned {:?}: {} raw file(s)", root, snapshot.len());
        snapshot
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext_lower)
            })
            .unwrap_or(false)
    }
}
