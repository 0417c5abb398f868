//! Online-weight sampling table.
//!
//! Periodic samples of total online representative weight, used to derive
//! the quorum threshold for election confirmation.

use crate::StoreError;
use calyx_types::Amount;

/// Trait for the `online_weight` table: time_ms → [`Amount`].
pub trait OnlineWeightStore {
    fn put(&self, time_ms: u64, weight: Amount) -> Result<(), StoreError>;
    fn del(&self, time_ms: u64) -> Result<(), StoreError>;
    fn count(&self) -> Result<u64, StoreError>;

    /// Samples in ascending time order.
    fn begin(&self) -> Result<Vec<(u64, Amount)>, StoreError>;

    /// Drop the oldest samples until at most `max_samples` remain.
    fn trim(&self, max_samples: usize) -> Result<usize, StoreError>;
}
