//! Entries visited during a walk and the decisions made about them.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Kind of a visited filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory that may be descended into.
    Directory,
    /// Symbolic link that is not followed.
    Symlink,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// A filesystem node considered by the walker.
///
/// Only lives for the duration of one visit decision.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Absolute path.
    pub path: PathBuf,
    /// Path relative to the walk root, `/`-separated on every platform.
    pub relative: String,
    /// Final path component.
    pub name: CompactString,
    /// Entry kind.
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Build an entry from its absolute path and the walk root.
    ///
    /// Returns `None` when `path` does not lie strictly beneath `root`.
    pub fn new(root: &Path, path: impl Into<PathBuf>, kind: EntryKind) -> Option<Self> {
        let path = path.into();
        let relative = relative_slash_path(root, &path)?;
        if relative.is_empty() {
            return None;
        }
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_default();

        Some(Self {
            path,
            relative,
            name,
            kind,
        })
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Render `path` relative to `root` with forward slashes.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = stripped
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

/// Why an entry was pruned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum PruneReason {
    /// Matched by the ignore rules.
    Ignored,
    /// Root-relative path contains an excluded substring.
    ExcludedSubstring,
    /// Directory name starts with an excluded prefix.
    HiddenDirectory,
    /// File extension is excluded.
    ExcludedExtension,
    /// File name is excluded.
    ExcludedFilename,
    /// Followed link leads back to an ancestor directory.
    SymlinkCycle,
}

/// Outcome of the rule pipeline for a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Recurse into this directory.
    Descend,
    /// Append this file to the result.
    Include,
    /// Skip the entry and, for directories, its whole subtree.
    Prune(PruneReason),
}

impl Decision {
    /// Check if the entry survives the rules.
    pub fn is_kept(&self) -> bool {
        !matches!(self, Self::Prune(_))
    }
}
