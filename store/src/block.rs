//! Block table.
//!
//! Values are opaque wire bytes rather than a domain `Block` type: the
//! block wire codec lives in `calyx-ledger`, which depends on this crate
//! for its storage traits, so this crate cannot depend back on the block
//! type without a cycle.

use crate::StoreError;
use calyx_types::{Account, Hash};

/// Trait for the `blocks` table: hash → serialized block (with sideband).
pub trait BlockStore {
    fn put(&self, hash: &Hash, block_bytes: &[u8]) -> Result<(), StoreError>;
    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError>;
    fn del(&self, hash: &Hash) -> Result<(), StoreError>;
    fn exists(&self, hash: &Hash) -> Result<bool, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;

    /// Successor hash decoded from the stored sideband, if any. Kept as a
    /// narrow accessor rather than requiring callers to decode the full
    /// block bytes just to walk a chain forward (used by fork rollback).
    fn successor(&self, hash: &Hash) -> Result<Option<Hash>, StoreError>;

    /// Account owning the block, decoded from the stored sideband.
    fn account(&self, hash: &Hash) -> Result<Option<Account>, StoreError>;
}
