//! The ordered exclusion pipeline applied to every visited entry.

use std::sync::Arc;

use codebasetxt_core::{Decision, DirectoryEntry, EntryKind, ExclusionPolicy, PruneReason};

use crate::matcher::IgnoreMatcher;

/// Decides the fate of each entry below the walk root.
///
/// Rules run in a fixed order and stop at the first match:
///
/// 1. ignore rules
/// 2. excluded path substrings (`drizzle`, `node_modules`)
/// 3. directories: excluded name prefix (`.`), otherwise descend
/// 4. everything else: excluded extension, then excluded file name
///
/// Cloning is cheap; the matcher and policy are shared.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    matcher: Arc<IgnoreMatcher>,
    policy: Arc<ExclusionPolicy>,
}

impl EntryFilter {
    pub fn new(matcher: IgnoreMatcher, policy: ExclusionPolicy) -> Self {
        Self {
            matcher: Arc::new(matcher),
            policy: Arc::new(policy),
        }
    }

    /// Run the pipeline for one entry.
    pub fn decide(&self, entry: &DirectoryEntry) -> Decision {
        if self.matcher.matches(&entry.relative, entry.is_dir()) {
            return Decision::Prune(PruneReason::Ignored);
        }

        if self.policy.excluded_substring(&entry.relative).is_some() {
            return Decision::Prune(PruneReason::ExcludedSubstring);
        }

        match entry.kind {
            EntryKind::Directory => {
                if self.policy.is_excluded_dir_name(&entry.name) {
                    Decision::Prune(PruneReason::HiddenDirectory)
                } else {
                    Decision::Descend
                }
            }
            // Unfollowed links go through the file rules like any other leaf.
            EntryKind::File | EntryKind::Symlink => {
                if self.policy.is_excluded_extension(&entry.name) {
                    Decision::Prune(PruneReason::ExcludedExtension)
                } else if self.policy.is_excluded_filename(&entry.name) {
                    Decision::Prune(PruneReason::ExcludedFilename)
                } else {
                    Decision::Include
                }
            }
        }
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::new(IgnoreMatcher::empty(), ExclusionPolicy::default())
    }
}
