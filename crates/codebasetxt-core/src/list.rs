//! Walk output and statistics.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entry::PruneReason;
use crate::error::WalkWarning;

/// A file accepted by the walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedFile {
    /// Absolute path.
    pub path: PathBuf,
    /// Path relative to the walk root, `/`-separated.
    pub relative: String,
}

impl ListedFile {
    pub fn new(path: impl Into<PathBuf>, relative: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            relative: relative.into(),
        }
    }
}

/// Summary statistics for a walk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkStats {
    /// Files accepted.
    pub files_included: u64,
    /// Directories descended into, excluding the root.
    pub dirs_descended: u64,
    /// Pruned entries per reason.
    pub pruned: BTreeMap<String, u64>,
}

impl WalkStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted file.
    pub fn record_file(&mut self) {
        self.files_included += 1;
    }

    /// Record a directory that was descended into.
    pub fn record_dir(&mut self) {
        self.dirs_descended += 1;
    }

    /// Add `count` pruned entries for `reason`.
    pub fn record_pruned(&mut self, reason: PruneReason, count: u64) {
        if count > 0 {
            *self.pruned.entry(reason.to_string()).or_default() += count;
        }
    }

    /// Number of entries pruned for `reason`.
    pub fn pruned_for(&self, reason: PruneReason) -> u64 {
        self.pruned.get(reason.as_ref()).copied().unwrap_or(0)
    }

    /// Total number of pruned entries.
    pub fn total_pruned(&self) -> u64 {
        self.pruned.values().sum()
    }
}

/// Ordered list of files produced by a walk.
///
/// Order is depth-first in directory-listing order. That order depends on
/// the platform and filesystem unless sibling sorting was enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileList {
    /// Canonical walk root.
    pub root: PathBuf,
    /// Accepted files in traversal order.
    pub files: Vec<ListedFile>,
    /// Walk statistics.
    pub stats: WalkStats,
    /// Diagnostics gathered while loading rules and walking.
    pub warnings: Vec<WalkWarning>,
    /// Time spent walking.
    pub walk_duration: Duration,
}

impl FileList {
    /// Create a new file list.
    pub fn new(
        root: PathBuf,
        files: Vec<ListedFile>,
        stats: WalkStats,
        warnings: Vec<WalkWarning>,
        walk_duration: Duration,
    ) -> Self {
        Self {
            root,
            files,
            stats,
            warnings,
            walk_duration,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListedFile> {
        self.files.iter()
    }

    /// Root-relative paths in traversal order.
    pub fn relative_paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.relative.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a ListedFile;
    type IntoIter = std::slice::Iter<'a, ListedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_pruned_tally() {
        let mut stats = WalkStats::new();
        stats.record_pruned(PruneReason::Ignored, 2);
        stats.record_pruned(PruneReason::Ignored, 1);
        stats.record_pruned(PruneReason::HiddenDirectory, 0);

        assert_eq!(stats.pruned_for(PruneReason::Ignored), 3);
        assert_eq!(stats.pruned_for(PruneReason::HiddenDirectory), 0);
        assert!(!stats.pruned.contains_key("hidden-directory"));
        assert_eq!(stats.total_pruned(), 3);
    }

    #[test]
    fn test_file_list_accessors() {
        let list = FileList::new(
            PathBuf::from("/repo"),
            vec![
                ListedFile::new("/repo/a.txt", "a.txt"),
                ListedFile::new("/repo/src/index.js", "src/index.js"),
            ],
            WalkStats::new(),
            Vec::new(),
            Duration::ZERO,
        );

        assert_eq!(list.len(), 2);
        assert_eq!(list.relative_paths(), ["a.txt", "src/index.js"]);
        assert_eq!((&list).into_iter().count(), 2);
    }
}
