//! Filtering directory walker for codebasetxt.
//!
//! This crate decides which files of a source tree end up in the
//! aggregate document.
//!
//! # Overview
//!
//! - [`IgnoreMatcher`] compiles a gitignore-style rules file once
//! - [`EntryFilter`] runs the ordered exclusion pipeline for one entry
//! - [`TreeFilterWalker`] walks the tree depth-first and prunes while
//!   listing, so excluded directories are never descended into
//!
//! # Example
//!
//! ```rust,no_run
//! use codebasetxt_scan::{TreeFilterWalker, WalkConfig};
//!
//! let config = WalkConfig::new("/path/to/project");
//! let walker = TreeFilterWalker::from_config(&config);
//! let list = walker.walk(&config.root).unwrap();
//!
//! for file in &list {
//!     println!("{}", file.relative);
//! }
//! ```

mod filter;
mod matcher;
mod tally;
mod walker;

pub use filter::EntryFilter;
pub use matcher::IgnoreMatcher;
pub use tally::PruneTally;
pub use walker::{walk, TreeFilterWalker};

// Re-export core types for convenience
pub use codebasetxt_core::{
    Decision, DirectoryEntry, EntryKind, ExclusionPolicy, FileList, ListedFile, PruneReason,
    WalkConfig, WalkError, WalkStats, WalkWarning, WarningKind,
};
