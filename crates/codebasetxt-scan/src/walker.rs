//! Depth-first walker that prunes entries while listing each directory.

use std::fs::FileType;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, info, warn};

use codebasetxt_core::{
    relative_slash_path, Decision, DirectoryEntry, EntryKind, ExclusionPolicy, FileList,
    ListedFile, PruneReason, WalkConfig, WalkError, WalkStats, WalkWarning,
};

use crate::filter::EntryFilter;
use crate::matcher::IgnoreMatcher;
use crate::tally::PruneTally;

/// Walks a directory tree and returns the files that survive the rules.
///
/// Traversal is serial and depth-first. Pruned directories are removed from
/// their parent's listing before the walker would descend into them, so no
/// descendant of a pruned directory is ever read.
#[derive(Debug, Clone)]
pub struct TreeFilterWalker {
    filter: EntryFilter,
    follow_symlinks: bool,
    sort_entries: bool,
    load_warnings: Vec<WalkWarning>,
}

impl TreeFilterWalker {
    /// Create a walker from an already loaded matcher and a policy.
    pub fn new(matcher: IgnoreMatcher, policy: ExclusionPolicy) -> Self {
        Self {
            filter: EntryFilter::new(matcher, policy),
            follow_symlinks: false,
            sort_entries: false,
            load_warnings: Vec::new(),
        }
    }

    /// Create a walker for `config`, loading its rules file.
    pub fn from_config(config: &WalkConfig) -> Self {
        let (matcher, load_warnings) = IgnoreMatcher::load(&config.root, &config.rules_path());
        Self {
            filter: EntryFilter::new(matcher, config.policy.clone()),
            follow_symlinks: config.follow_symlinks,
            sort_entries: config.sort_entries,
            load_warnings,
        }
    }

    /// Follow symbolic links, pruning any that lead back to an ancestor.
    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.follow_symlinks = yes;
        self
    }

    /// Visit siblings in file-name order.
    pub fn sort_entries(mut self, yes: bool) -> Self {
        self.sort_entries = yes;
        self
    }

    /// Diagnostics produced while loading the rules file.
    pub fn load_warnings(&self) -> &[WalkWarning] {
        &self.load_warnings
    }

    /// Walk `root` and collect the accepted files.
    ///
    /// The root itself is never filtered. A directory below the root that
    /// cannot be listed fails the walk with [`WalkError::Traversal`].
    pub fn walk(&self, root: impl AsRef<Path>) -> Result<FileList, WalkError> {
        let start = Instant::now();
        let root = root.as_ref();
        let root_path = root.canonicalize().map_err(|e| WalkError::io(root, e))?;

        if !root_path.is_dir() {
            return Err(WalkError::NotADirectory { path: root_path });
        }

        let tally = Arc::new(PruneTally::new());
        let filter = self.filter.clone();
        let dir_tally = Arc::clone(&tally);
        let entry_root = root_path.clone();
        let follow_symlinks = self.follow_symlinks;

        let walker = WalkDir::new(&root_path)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(self.follow_symlinks)
            .sort(self.sort_entries)
            .min_depth(1)
            .process_read_dir(move |depth, dir, _state, children| {
                // The first call only carries the root entry itself.
                if depth.is_none() {
                    return;
                }
                children.retain(|child| {
                    let Ok(child) = child else {
                        return true;
                    };
                    let path = child.path();
                    let kind = entry_kind(&child.file_type());
                    let Some(entry) = DirectoryEntry::new(&entry_root, path, kind) else {
                        return true;
                    };

                    let decision = match filter.decide(&entry) {
                        Decision::Descend if follow_symlinks => {
                            check_cycle(&entry_root, dir, &entry.path, &dir_tally)
                        }
                        decision => decision,
                    };

                    if let Decision::Prune(reason) = decision {
                        if reason != PruneReason::SymlinkCycle {
                            dir_tally.record(reason);
                        }
                        debug!(path = %entry.relative, %reason, "pruned");
                    }
                    decision.is_kept()
                });
            });

        let visited = walker
            .into_iter()
            .map(|entry| entry.map(Visited::from_dir_entry).map_err(traversal_error));
        let (files, mut stats) = collect_files(&root_path, visited)?;

        tally.apply_to(&mut stats);

        let mut warnings = self.load_warnings.clone();
        let cycles = tally.cycle_warnings();
        for cycle in &cycles {
            warn!(path = %cycle.path.display(), "{}", cycle.message);
        }
        warnings.extend(cycles);

        let walk_duration = start.elapsed();
        info!(
            root = %root_path.display(),
            files = stats.files_included,
            dirs = stats.dirs_descended,
            pruned = stats.total_pruned(),
            elapsed_ms = walk_duration.as_millis() as u64,
            "walk complete"
        );

        Ok(FileList::new(root_path, files, stats, warnings, walk_duration))
    }
}

impl Default for TreeFilterWalker {
    fn default() -> Self {
        Self::new(IgnoreMatcher::empty(), ExclusionPolicy::default())
    }
}

/// Walk `config.root` with the rules and policy from `config`.
pub fn walk(config: &WalkConfig) -> Result<FileList, WalkError> {
    TreeFilterWalker::from_config(config).walk(&config.root)
}

/// A walked entry reduced to what the collector needs.
#[derive(Debug)]
struct Visited {
    path: PathBuf,
    is_dir: bool,
    /// Set when the entry is a directory whose listing failed.
    listing_error: Option<WalkError>,
}

impl Visited {
    fn from_dir_entry(mut entry: jwalk::DirEntry<((), ())>) -> Self {
        let path = entry.path();
        let listing_error = entry
            .read_children_error
            .take()
            .map(|err| WalkError::traversal(&path, io_error(&err)));
        Self {
            is_dir: entry.file_type().is_dir(),
            path,
            listing_error,
        }
    }
}

/// Collect files in traversal order, failing on the first directory that
/// could not be listed.
fn collect_files<I>(root: &Path, entries: I) -> Result<(Vec<ListedFile>, WalkStats), WalkError>
where
    I: IntoIterator<Item = Result<Visited, WalkError>>,
{
    let mut files = Vec::new();
    let mut stats = WalkStats::new();

    for visited in entries {
        let visited = visited?;
        if visited.is_dir {
            if let Some(err) = visited.listing_error {
                return Err(err);
            }
            stats.record_dir();
            continue;
        }

        if let Some(relative) = relative_slash_path(root, &visited.path) {
            stats.record_file();
            files.push(ListedFile::new(visited.path, relative));
        }
    }

    Ok((files, stats))
}

fn entry_kind(file_type: &FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else {
        EntryKind::File
    }
}

/// Prune a followed directory link whose target contains any directory on
/// the walked path from `root` down to `dir`.
///
/// Each step of that path is resolved on its own, so a chain of links that
/// leads back to a directory visited earlier is caught as well.
fn check_cycle(root: &Path, dir: &Path, path: &Path, tally: &PruneTally) -> Decision {
    let is_link = std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return Decision::Descend;
    }

    let Ok(target) = path.canonicalize() else {
        return Decision::Descend;
    };

    let loops_back = dir
        .ancestors()
        .take_while(|ancestor| ancestor.starts_with(root))
        .filter_map(|ancestor| ancestor.canonicalize().ok())
        .any(|ancestor| ancestor.starts_with(&target));

    if loops_back {
        tally.record_cycle(path.to_path_buf(), target);
        Decision::Prune(PruneReason::SymlinkCycle)
    } else {
        Decision::Descend
    }
}

fn traversal_error(err: jwalk::Error) -> WalkError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
    WalkError::traversal(path, io_error(&err))
}

fn io_error(err: &jwalk::Error) -> std::io::Error {
    let kind = err
        .io_error()
        .map(|e| e.kind())
        .unwrap_or(std::io::ErrorKind::Other);
    std::io::Error::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir(root.join(".cache")).unwrap();

        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn a() {}").unwrap();
        fs::write(root.join("src/nested/mod.rs"), "mod x;").unwrap();
        fs::write(root.join("src/logo.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join(".cache/blob"), "cached").unwrap();

        temp
    }

    fn sorted_relative(list: &FileList) -> Vec<String> {
        let mut paths: Vec<String> = list.iter().map(|f| f.relative.clone()).collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_basic_walk() {
        let temp = create_test_tree();
        let list = TreeFilterWalker::default().walk(temp.path()).unwrap();

        assert_eq!(
            sorted_relative(&list),
            ["README.md", "src/lib.rs", "src/nested/mod.rs"]
        );
        assert_eq!(list.stats.files_included, 3);
        assert_eq!(list.stats.dirs_descended, 2);
        assert_eq!(list.stats.pruned_for(PruneReason::HiddenDirectory), 1);
        assert_eq!(list.stats.pruned_for(PruneReason::ExcludedExtension), 1);
    }

    #[test]
    fn test_files_are_absolute_and_under_root() {
        let temp = create_test_tree();
        let list = TreeFilterWalker::default().walk(temp.path()).unwrap();

        for file in &list {
            assert!(file.path.is_absolute());
            assert!(file.path.starts_with(&list.root));
            assert!(file.path.is_file());
        }
    }

    #[test]
    fn test_sorted_walk_is_depth_first() {
        let temp = create_test_tree();
        let list = TreeFilterWalker::default()
            .sort_entries(true)
            .walk(temp.path())
            .unwrap();

        assert_eq!(
            list.relative_paths(),
            ["README.md", "src/lib.rs", "src/nested/mod.rs"]
        );
    }

    #[test]
    fn test_root_not_a_directory() {
        let temp = create_test_tree();
        let err = TreeFilterWalker::default()
            .walk(temp.path().join("README.md"))
            .unwrap_err();

        assert!(matches!(err, WalkError::NotADirectory { .. }));
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = TreeFilterWalker::default()
            .walk(temp.path().join("missing"))
            .unwrap_err();

        assert!(matches!(err, WalkError::NotFound { .. }));
    }

    #[test]
    fn test_hidden_root_is_not_filtered() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".hidden-root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let list = TreeFilterWalker::default().walk(&root).unwrap();
        assert_eq!(list.relative_paths(), ["a.txt"]);
    }

    fn visited(path: &str, is_dir: bool) -> Result<Visited, WalkError> {
        Ok(Visited {
            path: PathBuf::from(path),
            is_dir,
            listing_error: None,
        })
    }

    #[test]
    fn test_collect_files_fails_on_unlisted_directory() {
        let locked = Visited {
            path: PathBuf::from("/repo/locked"),
            is_dir: true,
            listing_error: Some(WalkError::traversal(
                "/repo/locked",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            )),
        };
        let entries = vec![
            visited("/repo/a.txt", false),
            Ok(locked),
            visited("/repo/z.txt", false),
        ];

        let err = collect_files(Path::new("/repo"), entries).unwrap_err();
        match err {
            WalkError::Traversal { path, source } => {
                assert_eq!(path, PathBuf::from("/repo/locked"));
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected traversal error, got {other:?}"),
        }
    }

    #[test]
    fn test_collect_files_keeps_order_and_counts() {
        let entries = vec![
            visited("/repo/b.txt", false),
            visited("/repo/src", true),
            visited("/repo/src/a.rs", false),
        ];

        let (files, stats) = collect_files(Path::new("/repo"), entries).unwrap();
        let relative: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();

        assert_eq!(relative, ["b.txt", "src/a.rs"]);
        assert_eq!(stats.files_included, 2);
        assert_eq!(stats.dirs_descended, 1);
    }

    #[test]
    fn test_from_config_reports_missing_rules() {
        let temp = create_test_tree();
        let walker = TreeFilterWalker::from_config(&WalkConfig::new(temp.path()));

        assert_eq!(walker.load_warnings().len(), 1);
        let list = walker.walk(temp.path()).unwrap();
        assert_eq!(list.warnings.len(), 1);
    }
}
