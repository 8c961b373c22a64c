//! Built-in exclusion lists applied after the ignore rules.

use serde::{Deserialize, Serialize};

const DEFAULT_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".svg", ".ico", ".pdf", ".zip", ".gz", ".tar", ".rar",
    ".7z", ".woff", ".ttf", ".eot", ".otf", ".sql", ".lock",
];

const DEFAULT_FILENAMES: &[&str] = &["package-lock.json"];

const DEFAULT_SUBSTRINGS: &[&str] = &["drizzle", "node_modules"];

const DEFAULT_DIR_PREFIXES: &[&str] = &["."];

/// Static exclusion configuration consulted by the walker.
///
/// All comparisons are case-insensitive. The lists are normalized to lower
/// case on construction, so lookups only lower-case the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionPolicy {
    /// File extensions to skip, including the leading dot.
    excluded_extensions: Vec<String>,
    /// Exact file names to skip.
    excluded_filenames: Vec<String>,
    /// Substrings that prune any entry whose root-relative path contains them.
    excluded_substrings: Vec<String>,
    /// Directory-name prefixes that prune a directory and its subtree.
    excluded_dir_prefixes: Vec<String>,
}

impl ExclusionPolicy {
    /// Create a policy from explicit lists.
    pub fn new<E, F, S, D>(extensions: E, filenames: F, substrings: S, dir_prefixes: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            excluded_extensions: extensions.into_iter().map(normalize_extension).collect(),
            excluded_filenames: lowercase_all(filenames),
            excluded_substrings: lowercase_all(substrings),
            excluded_dir_prefixes: dir_prefixes
                .into_iter()
                .map(|p| p.as_ref().to_string())
                .collect(),
        }
    }

    /// A policy that excludes nothing.
    pub fn permissive() -> Self {
        Self::new(
            Vec::<String>::new(),
            Vec::<String>::new(),
            Vec::<String>::new(),
            Vec::<String>::new(),
        )
    }

    pub fn excluded_extensions(&self) -> &[String] {
        &self.excluded_extensions
    }

    pub fn excluded_filenames(&self) -> &[String] {
        &self.excluded_filenames
    }

    pub fn excluded_substrings(&self) -> &[String] {
        &self.excluded_substrings
    }

    pub fn excluded_dir_prefixes(&self) -> &[String] {
        &self.excluded_dir_prefixes
    }

    /// Return the first excluded substring found in a root-relative path.
    pub fn excluded_substring(&self, relative_path: &str) -> Option<&str> {
        let lowered = relative_path.to_lowercase();
        self.excluded_substrings
            .iter()
            .find(|needle| lowered.contains(needle.as_str()))
            .map(String::as_str)
    }

    /// Check whether a directory name starts with an excluded prefix.
    pub fn is_excluded_dir_name(&self, name: &str) -> bool {
        self.excluded_dir_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Check whether a file name carries an excluded extension.
    pub fn is_excluded_extension(&self, name: &str) -> bool {
        match extension_of(name) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.excluded_extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }

    /// Check whether a file name is excluded outright.
    pub fn is_excluded_filename(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.excluded_filenames.iter().any(|f| *f == lowered)
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSIONS.iter().copied(),
            DEFAULT_FILENAMES.iter().copied(),
            DEFAULT_SUBSTRINGS.iter().copied(),
            DEFAULT_DIR_PREFIXES.iter().copied(),
        )
    }
}

/// Extension of a file name including the dot.
///
/// A leading dot does not start an extension, so `.bashrc` has none while
/// `archive.tar.gz` yields `.gz`.
pub(crate) fn extension_of(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx..]),
    }
}

fn normalize_extension(ext: impl AsRef<str>) -> String {
    let ext = ext.as_ref().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn lowercase_all<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_lowercase()).collect()
}
