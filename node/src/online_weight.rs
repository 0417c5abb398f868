//! Online representative weight sampling — supplemental to the distilled
//! spec (§3): periodic samples of total online weight, persisted through
//! [`calyx_store::OnlineWeightStore`], trimmed to a retention window.
//!
//! Generalises the teacher's in-memory `OnlineWeightTracker` (median of a
//! `VecDeque` of recent samples) onto the store-backed `online_weight`
//! table (§4.4): samples survive a restart, and retention is enforced by
//! `trim` rather than a fixed-capacity ring buffer.

use calyx_store::OnlineWeightStore;
use calyx_types::Amount;

/// Two weeks of samples at 30-minute intervals.
pub const DEFAULT_MAX_SAMPLES: usize = 672;

/// Samples total online representative weight over time and derives a
/// trended value for quorum calculation.
pub struct OnlineWeightSampler<'s, S: OnlineWeightStore> {
    store: &'s S,
    max_samples: usize,
    minimum_weight: Amount,
}

impl<'s, S: OnlineWeightStore> OnlineWeightSampler<'s, S> {
    pub fn new(store: &'s S, minimum_weight: Amount) -> Self {
        Self { store, max_samples: DEFAULT_MAX_SAMPLES, minimum_weight }
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Record a sample at `time_ms` and trim the table back down to
    /// `max_samples`.
    pub fn record_sample(&self, weight: Amount, time_ms: u64) -> Result<(), calyx_store::StoreError> {
        self.store.put(time_ms, weight)?;
        self.store.trim(self.max_samples)?;
        Ok(())
    }

    /// Median of all retained samples, floored at `minimum_weight`. Returns
    /// `minimum_weight` if no samples have been recorded yet.
    pub fn trended_weight(&self) -> Result<Amount, calyx_store::StoreError> {
        let samples = self.store.begin()?;
        if samples.is_empty() {
            return Ok(self.minimum_weight);
        }
        let mut weights: Vec<u128> = samples.iter().map(|(_, w)| w.raw()).collect();
        weights.sort_unstable();
        let median = Amount::new(weights[weights.len() / 2]);
        Ok(median.max(self.minimum_weight))
    }

    /// 67% of the greater of the most recent sample and the trended weight,
    /// floored at `minimum_weight` — the quorum delta used to decide
    /// whether enough online weight has voted to confirm a block.
    pub fn quorum_delta(&self) -> Result<Amount, calyx_store::StoreError> {
        let samples = self.store.begin()?;
        let current = samples.last().map(|(_, w)| *w).unwrap_or(Amount::ZERO);
        let trended = self.trended_weight()?;
        let base = current.max(trended).max(self.minimum_weight);
        Ok(Amount::new(base.raw() * 67 / 100))
    }

    pub fn sample_count(&self) -> Result<u64, calyx_store::StoreError> {
        self.store.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calyx_store_lmdb::LmdbStore;
    use tempfile::tempdir;

    fn open_store() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempdir().unwrap();
        let store = LmdbStore::open(dir.path(), 12, 10 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn no_samples_returns_minimum_weight() {
        let (_dir, store) = open_store();
        let sampler = OnlineWeightSampler::new(&store, Amount::new(100));
        assert_eq!(sampler.trended_weight().unwrap(), Amount::new(100));
    }

    #[test]
    fn trended_weight_is_median_of_samples() {
        let (_dir, store) = open_store();
        let sampler = OnlineWeightSampler::new(&store, Amount::ZERO);
        sampler.record_sample(Amount::new(100), 1).unwrap();
        sampler.record_sample(Amount::new(300), 2).unwrap();
        sampler.record_sample(Amount::new(200), 3).unwrap();

        assert_eq!(sampler.trended_weight().unwrap(), Amount::new(200));
    }

    #[test]
    fn trended_weight_floored_at_minimum() {
        let (_dir, store) = open_store();
        let sampler = OnlineWeightSampler::new(&store, Amount::new(1_000));
        sampler.record_sample(Amount::new(50), 1).unwrap();
        sampler.record_sample(Amount::new(60), 2).unwrap();

        assert_eq!(sampler.trended_weight().unwrap(), Amount::new(1_000));
    }

    #[test]
    fn quorum_delta_is_67_percent_of_base() {
        let (_dir, store) = open_store();
        let sampler = OnlineWeightSampler::new(&store, Amount::ZERO);
        sampler.record_sample(Amount::new(1_000), 1).unwrap();
        assert_eq!(sampler.quorum_delta().unwrap(), Amount::new(670));
    }

    #[test]
    fn sample_trimmed_to_max_samples() {
        let (_dir, store) = open_store();
        let sampler = OnlineWeightSampler::new(&store, Amount::ZERO).with_max_samples(2);
        sampler.record_sample(Amount::new(10), 1).unwrap();
        sampler.record_sample(Amount::new(20), 2).unwrap();
        sampler.record_sample(Amount::new(30), 3).unwrap();

        assert_eq!(sampler.sample_count().unwrap(), 2);
    }
}
