//! Error types for bundle output.

use std::path::PathBuf;

use thiserror::Error;

/// Failures on the bundle destination. Unreadable source files are
/// reported as warnings instead.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The destination file could not be created.
    #[error("Cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the destination failed.
    #[error("Failed to write bundle: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    /// Writing to a destination file failed.
    #[error("Failed to write bundle to {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    pub fn create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }

    pub fn write(source: std::io::Error) -> Self {
        Self::Write { source }
    }

    /// Attach the destination path to a write failure.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Write { source } => Self::WriteFile {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}
