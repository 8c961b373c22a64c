//! Prune bookkeeping shared with the per-directory filter callback.

use std::path::PathBuf;

use dashmap::DashMap;
use strum::IntoEnumIterator;

use codebasetxt_core::{PruneReason, WalkStats, WalkWarning};

/// Counts pruned entries per reason and remembers broken symlink cycles.
///
/// The walk itself is serial. The `Arc` and the `DashMap`s are only there
/// because the per-directory callback handed to jwalk must be
/// `Send + Sync`.
#[derive(Debug, Default)]
pub struct PruneTally {
    counts: DashMap<PruneReason, u64>,
    cycles: DashMap<PathBuf, PathBuf>,
}

impl PruneTally {
    /// Create a new empty tally.
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
            cycles: DashMap::new(),
        }
    }

    /// Record one pruned entry.
    pub fn record(&self, reason: PruneReason) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }

    /// Record a link at `path` resolving to the ancestor `target`.
    pub fn record_cycle(&self, path: PathBuf, target: PathBuf) {
        self.record(PruneReason::SymlinkCycle);
        self.cycles.insert(path, target);
    }

    /// Number of entries pruned for `reason`.
    pub fn count(&self, reason: PruneReason) -> u64 {
        self.counts.get(&reason).map(|c| *c).unwrap_or(0)
    }

    /// Fold the counts into walk statistics.
    pub fn apply_to(&self, stats: &mut WalkStats) {
        for reason in PruneReason::iter() {
            stats.record_pruned(reason, self.count(reason));
        }
    }

    /// Warnings for every cycle, ordered by path.
    pub fn cycle_warnings(&self) -> Vec<WalkWarning> {
        let mut cycles: Vec<(PathBuf, PathBuf)> = self
            .cycles
            .iter()
            .map(|c| (c.key().clone(), c.value().clone()))
            .collect();
        cycles.sort();
        cycles
            .into_iter()
            .map(|(path, target)| WalkWarning::symlink_cycle(path, target))
            .collect()
    }
}
