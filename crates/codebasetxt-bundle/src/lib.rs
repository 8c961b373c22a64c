//! Aggregate document writer for codebasetxt.
//!
//! Turns a [`FileList`] into a single text document where every file is
//! introduced by a `---` rule and a `FILE:` header:
//!
//! ```text
//! ---
//! FILE: src/index.js
//!
//! console.log("hello");
//!
//! ```
//!
//! ```rust,ignore
//! use codebasetxt_bundle::BundleWriter;
//! use codebasetxt_scan::{walk, WalkConfig};
//!
//! let list = walk(&WalkConfig::new(".")).unwrap();
//! let report = BundleWriter::new()
//!     .write_file(&list, "codebase.txt".as_ref())
//!     .unwrap();
//!
//! println!("{} files bundled", report.files_written);
//! ```

mod error;
mod writer;

pub use error::BundleError;
pub use writer::{write_entry, BundleReport, BundleWriter};

pub use codebasetxt_core::FileList;
