//! Ledger pruning (§4.4): "blocks older than a configured depth may be
//! removed from `blocks` and recorded in `pruned`; their balances remain
//! derivable via `account_info` and the sideband of surviving successors."
//!
//! Generalised from the teacher's `ledger::pruning`: the engine itself
//! stays storage-agnostic (it decides which hashes qualify, the caller
//! deletes them in a `WriteBatch`), but the candidate shape and the two
//! thresholds are the ones the configuration surface (§6) actually
//! exposes — `max_pruning_age_s` and `max_pruning_depth` — rather than the
//! teacher's expired/revoked TRST split, which has no counterpart here.

/// Configuration for the pruning pass.
pub struct PruningConfig {
    pub enabled: bool,
    /// Minimum age, in seconds, a block must have before it is eligible.
    pub max_pruning_age_s: u64,
    /// Minimum number of blocks that must remain above a candidate on its
    /// chain (i.e. how far behind the confirmed frontier it must be).
    pub max_pruning_depth: u64,
    /// Upper bound on how many hashes one pass returns (limits I/O per
    /// cycle).
    pub batch_size: usize,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self { enabled: false, max_pruning_age_s: 5 * 24 * 3600, max_pruning_depth: 100_000, batch_size: 1000 }
    }
}

/// One block eligible for consideration: its position on its chain and
/// when it was cemented, as read from `confirmation_height`/sideband.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PruneCandidate {
    pub hash: calyx_types::Hash,
    pub height: u64,
    pub cemented_at: u64,
}

/// Result of a pruning pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PruneResult {
    pub pruned: usize,
}

/// Decides which cemented blocks qualify for pruning; performs no I/O.
pub struct LedgerPruner {
    config: PruningConfig,
}

impl LedgerPruner {
    pub fn new(config: PruningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PruningConfig {
        &self.config
    }

    /// `candidates` must already be restricted to one account's cemented
    /// blocks, ordered oldest-first. `confirmed_height` is that account's
    /// current confirmation height, `now_secs` the current wall clock.
    ///
    /// A candidate qualifies when it is both old enough
    /// (`cemented_at + max_pruning_age_s <= now_secs`) and deep enough
    /// behind the frontier (`height + max_pruning_depth <= confirmed_height`),
    /// preserving at least `max_pruning_depth` blocks of recent history
    /// that bootstrap peers might still be walking.
    pub fn find_pruneable(
        &self,
        candidates: &[PruneCandidate],
        confirmed_height: u64,
        now_secs: u64,
    ) -> Vec<calyx_types::Hash> {
        if !self.config.enabled {
            return Vec::new();
        }

        candidates
            .iter()
            .filter(|c| c.cemented_at.saturating_add(self.config.max_pruning_age_s) <= now_secs)
            .filter(|c| c.height.saturating_add(self.config.max_pruning_depth) <= confirmed_height)
            .take(self.config.batch_size)
            .map(|c| c.hash)
            .collect()
    }

    pub fn prune(&self, candidates: &[PruneCandidate], confirmed_height: u64, now_secs: u64) -> PruneResult {
        let pruneable = self.find_pruneable(candidates, confirmed_height, now_secs);
        PruneResult { pruned: pruneable.len() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calyx_types::Hash;

    fn candidate(tag: u8, height: u64, cemented_at: u64) -> PruneCandidate {
        PruneCandidate { hash: Hash::new([tag; 32]), height, cemented_at }
    }

    #[test]
    fn disabled_pruning_returns_empty() {
        let pruner = LedgerPruner::new(PruningConfig { enabled: false, ..Default::default() });
        let candidates = vec![candidate(1, 1, 0)];
        assert!(pruner.find_pruneable(&candidates, 1_000_000, 1_000_000).is_empty());
    }

    #[test]
    fn respects_age_threshold() {
        let pruner = LedgerPruner::new(PruningConfig {
            enabled: true,
            max_pruning_age_s: 1000,
            max_pruning_depth: 0,
            batch_size: 100,
        });
        let old = candidate(1, 1, 0);
        let fresh = candidate(2, 1, 999_500);
        let result = pruner.find_pruneable(&[old, fresh], 1_000_000, 1_000_000);
        assert_eq!(result, vec![old.hash]);
    }

    #[test]
    fn respects_depth_threshold() {
        let pruner = LedgerPruner::new(PruningConfig {
            enabled: true,
            max_pruning_age_s: 0,
            max_pruning_depth: 50,
            batch_size: 100,
        });
        let deep = candidate(1, 10, 0);
        let shallow = candidate(2, 990, 0);
        let result = pruner.find_pruneable(&[deep, shallow], 1000, 1000);
        assert_eq!(result, vec![deep.hash]);
    }

    #[test]
    fn batch_size_caps_result() {
        let pruner = LedgerPruner::new(PruningConfig {
            enabled: true,
            max_pruning_age_s: 0,
            max_pruning_depth: 0,
            batch_size: 2,
        });
        let candidates = vec![candidate(1, 1, 0), candidate(2, 2, 0), candidate(3, 3, 0)];
        let result = pruner.prune(&candidates, 1000, 1000);
        assert_eq!(result.pruned, 2);
    }

    #[test]
    fn default_config_is_disabled() {
        let config = PruningConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.max_pruning_depth, 100_000);
    }
}
