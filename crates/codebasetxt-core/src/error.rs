//! Error types for walk operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// Permission denied for the walk root.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Walk root not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error while preparing the walk.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A directory below the root could not be listed.
    #[error("Cannot read directory {path}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WalkError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a traversal failure for a directory below the root.
    pub fn traversal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Traversal {
            path: path.into(),
            source,
        }
    }

    /// Check whether the walk failed partway through the tree.
    pub fn is_traversal(&self) -> bool {
        matches!(self, Self::Traversal { .. })
    }
}

/// Kind of walk warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Rules file missing or unreadable; no ignore rules apply.
    RulesFileUnreadable,
    /// A single rule line failed to compile and was skipped.
    InvalidPattern,
    /// A listed file could not be read as UTF-8 text.
    FileUnreadable,
    /// A followed symlink pointed back at an ancestor.
    SymlinkCycle,
}

/// Non-fatal diagnostic produced while loading rules, walking or bundling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl WalkWarning {
    /// Create a new warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a rules file that could not be read.
    pub fn rules_file_unreadable(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Could not read {}: {error}", path.display()),
            path,
            kind: WarningKind::RulesFileUnreadable,
        }
    }

    /// Create a warning for a rule line that did not compile.
    pub fn invalid_pattern(path: impl Into<PathBuf>, line: usize, error: impl std::fmt::Display) -> Self {
        Self {
            path: path.into(),
            message: format!("Invalid pattern on line {line}: {error}"),
            kind: WarningKind::InvalidPattern,
        }
    }

    /// Create a warning for a file skipped during bundling.
    pub fn file_unreadable(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Could not read file \"{}\": {error}", path.display()),
            path,
            kind: WarningKind::FileUnreadable,
        }
    }

    /// Create a warning for a symlink cycle.
    pub fn symlink_cycle(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let target = target.into();
        Self {
            message: format!(
                "Symlink cycle: {} -> {}",
                path.display(),
                target.display()
            ),
            path,
            kind: WarningKind::SymlinkCycle,
        }
    }
}
