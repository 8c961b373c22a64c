//! Writes every listed file into one framed text document.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use codebasetxt_core::{FileList, WalkWarning};

use crate::error::BundleError;

/// Summary of a bundle run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleReport {
    /// Files written into the document.
    pub files_written: u64,
    /// Bytes written, framing included.
    pub bytes_written: u64,
    /// Files left out because they could not be read.
    pub skipped: Vec<WalkWarning>,
    /// Destination file, when writing to disk.
    pub output: Option<PathBuf>,
}

/// Writes the aggregate document.
///
/// Each file is framed as `---\nFILE: <relative>\n\n<content>\n\n`. Files
/// that are not valid UTF-8 or cannot be read are skipped with a warning;
/// only failures on the destination abort the run.
#[derive(Debug, Clone, Default)]
pub struct BundleWriter {
    exclude: Vec<PathBuf>,
}

impl BundleWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Never embed the file at `path`, typically the destination itself.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude.push(path.into());
        self
    }

    /// Write the bundle for `list` into `out`.
    pub fn write_to<W: Write>(&self, list: &FileList, mut out: W) -> Result<BundleReport, BundleError> {
        let exclude: Vec<PathBuf> = self.exclude.iter().map(|p| canonical_or_self(p)).collect();
        let mut report = BundleReport::default();

        for file in list {
            if exclude.contains(&file.path) {
                debug!(path = %file.relative, "skipping bundle destination");
                continue;
            }

            let content = match fs::read_to_string(&file.path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "could not read file");
                    report.skipped.push(WalkWarning::file_unreadable(&file.path, &err));
                    continue;
                }
            };

            report.bytes_written += write_entry(&mut out, &file.relative, &content)
                .map_err(BundleError::write)?;
            report.files_written += 1;
        }

        out.flush().map_err(BundleError::write)?;
        Ok(report)
    }

    /// Write the bundle for `list` into the file at `output`, replacing it.
    pub fn write_file(&self, list: &FileList, output: &Path) -> Result<BundleReport, BundleError> {
        let file = File::create(output).map_err(|e| BundleError::create(output, e))?;

        let mut report = self
            .clone()
            .exclude(output)
            .write_to(list, BufWriter::new(file))
            .map_err(|e| e.with_path(output))?;
        report.output = Some(output.to_path_buf());

        info!(
            output = %output.display(),
            files = report.files_written,
            bytes = report.bytes_written,
            skipped = report.skipped.len(),
            "bundle written"
        );
        Ok(report)
    }
}

/// Write a single framed entry and return the number of bytes written.
pub fn write_entry<W: Write>(out: &mut W, relative: &str, content: &str) -> io::Result<u64> {
    let header = format!("---\nFILE: {relative}\n\n");
    out.write_all(header.as_bytes())?;
    out.write_all(content.as_bytes())?;
    out.write_all(b"\n\n")?;
    Ok((header.len() + content.len() + 2) as u64)
}

fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
