//! Core types and traits for codebasetxt.
//!
//! This crate provides the fundamental data structures shared by the
//! walker and the bundle writer: visited entries, the exclusion policy,
//! walk configuration, errors and the resulting file list.

mod config;
mod entry;
mod error;
mod list;
mod policy;

pub use config::{WalkConfig, WalkConfigBuilder};
pub use entry::{relative_slash_path, Decision, DirectoryEntry, EntryKind, PruneReason};
pub use error::{WalkError, WalkWarning, WarningKind};
pub use list::{FileList, ListedFile, WalkStats};
pub use policy::ExclusionPolicy;

/// Default name of the rules file looked up in the walk root.
pub const DEFAULT_RULES_FILE: &str = ".gitignore";
