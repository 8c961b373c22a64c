//! Gitignore-style rule matching.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

use codebasetxt_core::WalkWarning;

/// Compiled ignore rules loaded once before a walk.
///
/// Patterns follow gitignore semantics: the last matching pattern wins,
/// `!` re-includes, a trailing `/` restricts a pattern to directories, and a
/// pattern without a slash matches at any depth. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    gitignore: Gitignore,
    source: Option<PathBuf>,
}

impl IgnoreMatcher {
    /// A matcher without rules. Matches nothing.
    pub fn empty() -> Self {
        Self {
            gitignore: Gitignore::empty(),
            source: None,
        }
    }

    /// Load rules from `rules_file`.
    ///
    /// A missing or unreadable file yields an empty matcher together with a
    /// warning; lines that fail to compile are skipped with a warning each.
    pub fn load(root: &Path, rules_file: &Path) -> (Self, Vec<WalkWarning>) {
        match fs::read_to_string(rules_file) {
            Ok(contents) => {
                let (mut matcher, warnings) = Self::compile(root, &contents, rules_file);
                matcher.source = Some(rules_file.to_path_buf());
                debug!(
                    path = %rules_file.display(),
                    rules = matcher.len(),
                    "loaded ignore rules"
                );
                (matcher, warnings)
            }
            Err(err) => {
                warn!(
                    path = %rules_file.display(),
                    error = %err,
                    "could not read ignore rules, proceeding without them"
                );
                (
                    Self::empty(),
                    vec![WalkWarning::rules_file_unreadable(rules_file, &err)],
                )
            }
        }
    }

    /// Compile rules from in-memory text.
    pub fn parse(root: &Path, contents: &str) -> (Self, Vec<WalkWarning>) {
        Self::compile(root, contents, Path::new("<inline>"))
    }

    fn compile(root: &Path, contents: &str, origin: &Path) -> (Self, Vec<WalkWarning>) {
        let mut warnings = Vec::new();
        let mut builder = GitignoreBuilder::new(root);
        if let Err(err) = builder.case_insensitive(true) {
            warnings.push(WalkWarning::invalid_pattern(origin, 0, err));
        }

        for (idx, line) in contents.lines().enumerate() {
            if let Err(err) = builder.add_line(Some(origin.to_path_buf()), line) {
                warn!(path = %origin.display(), line = idx + 1, error = %err, "skipping invalid pattern");
                warnings.push(WalkWarning::invalid_pattern(origin, idx + 1, err));
            }
        }

        let gitignore = match builder.build() {
            Ok(gitignore) => gitignore,
            Err(err) => {
                warn!(path = %origin.display(), error = %err, "could not compile ignore rules");
                warnings.push(WalkWarning::invalid_pattern(origin, 0, err));
                Gitignore::empty()
            }
        };

        (
            Self {
                gitignore,
                source: None,
            },
            warnings,
        )
    }

    /// Check whether a root-relative, `/`-separated path is excluded.
    ///
    /// An excluded ancestor directory excludes the path no matter what the
    /// patterns say about the path itself. A trailing `/` marks a directory.
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        let is_dir = is_dir || relative_path.ends_with('/');
        let relative_path = relative_path.trim_matches('/');
        if relative_path.is_empty() || self.gitignore.is_empty() {
            return false;
        }

        let ancestor_ignored = relative_path
            .match_indices('/')
            .any(|(idx, _)| self.gitignore.matched(&relative_path[..idx], true).is_ignore());

        ancestor_ignored || self.gitignore.matched(relative_path, is_dir).is_ignore()
    }

    /// Number of compiled patterns, negations included.
    pub fn len(&self) -> usize {
        self.gitignore.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gitignore.is_empty()
    }

    /// File the rules were read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebasetxt_core::WarningKind;

    fn matcher(rules: &str) -> IgnoreMatcher {
        let (matcher, warnings) = IgnoreMatcher::parse(Path::new("/repo"), rules);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        matcher
    }

    #[test]
    fn test_empty_matches_nothing() {
        let m = IgnoreMatcher::empty();
        assert!(!m.matches("anything", false));
        assert!(!m.matches("dir/file.txt", false));
        assert!(m.is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let m = matcher("# a comment\n\n*.log\n");
        assert_eq!(m.len(), 1);
        assert!(m.matches("debug.log", false));
        assert!(!m.matches("# a comment", false));
    }

    #[test]
    fn test_slashless_pattern_matches_any_depth() {
        let m = matcher("*.log");
        assert!(m.matches("debug.log", false));
        assert!(m.matches("a/b/c/trace.log", false));
        assert!(!m.matches("log.txt", false));
    }

    #[test]
    fn test_negation_last_match_wins() {
        let m = matcher("*.log\n!important.log");
        assert!(m.matches("debug.log", false));
        assert!(!m.matches("important.log", false));

        let m = matcher("!important.log\n*.log");
        assert!(m.matches("important.log", false));
    }

    #[test]
    fn test_directory_only_pattern() {
        let m = matcher("build/");
        assert!(m.matches("build", true));
        assert!(!m.matches("build", false));
        assert!(m.matches("build/", false));
        assert!(m.matches("build/output.txt", false));
        assert!(!m.matches("buildtools", true));
        assert!(!m.matches("buildtools/readme.md", false));
    }

    #[test]
    fn test_anchored_pattern() {
        let m = matcher("/config.json\ndocs/internal");
        assert!(m.matches("config.json", false));
        assert!(!m.matches("sub/config.json", false));
        assert!(m.matches("docs/internal", true));
        assert!(!m.matches("other/docs/internal", true));
    }

    #[test]
    fn test_cannot_reinclude_under_ignored_dir() {
        let m = matcher("build/\n!build/keep.txt");
        assert!(m.matches("build/keep.txt", false));
        assert!(m.matches("build/other.txt", false));
    }

    #[test]
    fn test_reinclude_with_glob_children() {
        let m = matcher("build/*\n!build/keep.txt");
        assert!(!m.matches("build", true));
        assert!(!m.matches("build/keep.txt", false));
        assert!(m.matches("build/other.txt", false));
    }

    #[test]
    fn test_double_star() {
        let m = matcher("**/generated/**");
        assert!(m.matches("generated/a.rs", false));
        assert!(m.matches("src/generated/deep/b.rs", false));
        assert!(!m.matches("src/generator.rs", false));
    }

    #[test]
    fn test_case_insensitive() {
        let m = matcher("*.LOG");
        assert!(m.matches("debug.log", false));
        assert!(m.matches("Debug.Log", false));
    }

    #[test]
    fn test_load_missing_file_degrades() {
        let (m, warnings) = IgnoreMatcher::load(
            Path::new("/nonexistent-root"),
            Path::new("/nonexistent-root/.gitignore"),
        );
        assert!(m.is_empty());
        assert!(m.source().is_none());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::RulesFileUnreadable);
    }

    #[test]
    fn test_invalid_line_skipped() {
        let (m, warnings) = IgnoreMatcher::parse(Path::new("/repo"), "a[\n*.tmp");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::InvalidPattern);
        assert!(m.matches("x.tmp", false));
    }
}
