//! Unchecked-block cache table.
//!
//! Holds blocks the processor could not yet apply because a dependency
//! (predecessor or pending source) was missing, keyed by that dependency's
//! hash so arrival of the dependency can drain the matching entries back
//! into the processor queue.

use crate::StoreError;
use calyx_types::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UncheckedKey {
    pub dependency: Hash,
    pub block_hash: Hash,
}

/// The dependent block is stored as opaque wire bytes: this crate has no
/// dependency on the block wire codec (that lives in `calyx-ledger`, which
/// depends on this crate, not the reverse).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UncheckedInfo {
    pub block_bytes: Vec<u8>,
    /// Unix-seconds insertion time, used for `unchecked_cutoff_time_s` expiry.
    pub modified: u64,
}

/// Trait for the `unchecked` table: (dependency_hash, block_hash) → [`UncheckedInfo`].
pub trait UncheckedStore {
    fn put(&self, key: &UncheckedKey, info: &UncheckedInfo) -> Result<(), StoreError>;
    fn del(&self, key: &UncheckedKey) -> Result<(), StoreError>;
    fn count(&self) -> Result<u64, StoreError>;

    /// All entries whose dependency hash matches, in block-hash order.
    fn get(&self, dependency: &Hash) -> Result<Vec<(UncheckedKey, UncheckedInfo)>, StoreError>;

    /// Drop every entry older than `cutoff` (Unix seconds).
    fn drop_expired(&self, cutoff: u64) -> Result<usize, StoreError>;
}
