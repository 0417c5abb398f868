//! Pruned-block table.
//!
//! Records the hashes of blocks removed from `blocks` by the pruning
//! pass. Balances for accounts whose chains were pruned remain derivable
//! via `account_info` and the sideband of surviving successors.

use crate::StoreError;
use calyx_types::Hash;

/// Trait for the `pruned` table: hash → `()`.
pub trait PrunedStore {
    fn put(&self, hash: &Hash) -> Result<(), StoreError>;
    fn del(&self, hash: &Hash) -> Result<(), StoreError>;
    fn exists(&self, hash: &Hash) -> Result<bool, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
}
