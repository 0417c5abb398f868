//! Unchecked block cache — holds blocks whose dependency (predecessor or
//! pending source) has not arrived yet (§4.4's `unchecked` table).
//!
//! Generalises the dual gap-previous/gap-source maps from the teacher's
//! in-memory `UncheckedMap` onto [`calyx_store::UncheckedStore`]'s single
//! dependency-keyed table: both gap kinds are just "blocked on this hash",
//! so `insert_previous`/`insert_source` are thin callers of the same
//! `insert` with a different dependency hash, and `drain` works for either.
//! Blocks are round-tripped through their wire encoding since the store
//! layer has no dependency on `calyx-ledger`'s block codec.

use calyx_ledger::{Block, LedgerError};
use calyx_store::unchecked::{UncheckedInfo, UncheckedKey, UncheckedStore};
use calyx_types::Hash;

/// Thin, store-backed replacement for an in-memory gap map. Generic over
/// the store trait rather than a concrete engine so it can be driven by
/// `calyx-store-lmdb` in production and a null store in tests.
pub struct UncheckedCache<'s, S: UncheckedStore> {
    store: &'s S,
}

impl<'s, S: UncheckedStore> UncheckedCache<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Record `block` as waiting for its `previous` hash to arrive
    /// (gap-previous).
    pub fn insert_previous(&self, previous: Hash, block: &Block, now: u64) -> Result<(), LedgerError> {
        self.insert(previous, block, now)
    }

    /// Record `block` as waiting for its linked `source` send block to
    /// arrive (gap-source).
    pub fn insert_source(&self, source: Hash, block: &Block, now: u64) -> Result<(), LedgerError> {
        self.insert(source, block, now)
    }

    fn insert(&self, dependency: Hash, block: &Block, now: u64) -> Result<(), LedgerError> {
        let key = UncheckedKey { dependency, block_hash: block.hash() };
        let info = UncheckedInfo { block_bytes: block.to_wire_bytes(), modified: now };
        self.store.put(&key, &info).map_err(LedgerError::from)
    }

    /// Drain and decode every block that was waiting on `dependency`,
    /// removing their entries from the store.
    pub fn drain(&self, dependency: &Hash) -> Result<Vec<Block>, LedgerError> {
        let entries = self.store.get(dependency).map_err(LedgerError::from)?;
        let mut blocks = Vec::with_capacity(entries.len());
        for (key, info) in entries {
            self.store.del(&key).map_err(LedgerError::from)?;
            blocks.push(Block::from_wire_bytes(&info.block_bytes)?);
        }
        Ok(blocks)
    }

    /// Total number of unchecked entries across all dependency keys.
    pub fn len(&self) -> Result<u64, LedgerError> {
        self.store.count().map_err(LedgerError::from)
    }

    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }

    /// Drop every entry older than `cutoff` (Unix seconds) — the
    /// `unchecked_cutoff_time_s` sweep.
    pub fn drop_expired(&self, cutoff: u64) -> Result<usize, LedgerError> {
        self.store.drop_expired(cutoff).map_err(LedgerError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calyx_ledger::{OpenBlock, SendBlock};
    use calyx_store_lmdb::LmdbStore;
    use calyx_types::{Account, Amount, Signature, WorkNonce};
    use tempfile::tempdir;

    fn send_block(previous: Hash) -> Block {
        Block::Send(SendBlock {
            previous,
            destination: Account::new([2; 32]),
            balance: Amount::new(100),
            signature: Signature::ZERO,
            work: WorkNonce(0),
        })
    }

    fn open_block(source: Hash) -> Block {
        Block::Open(OpenBlock {
            source,
            representative: Account::new([3; 32]),
            account: Account::new([4; 32]),
            signature: Signature::ZERO,
            work: WorkNonce(0),
        })
    }

    fn open_store() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempdir().unwrap();
        let store = LmdbStore::open(dir.path(), 12, 10 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn insert_previous_then_drain_round_trips_block() {
        let (_dir, store) = open_store();
        let cache = UncheckedCache::new(&store);
        let previous = Hash::new([7; 32]);
        let block = send_block(previous);

        cache.insert_previous(previous, &block, 1_000).unwrap();
        assert_eq!(cache.len().unwrap(), 1);

        let drained = cache.drain(&previous).unwrap();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].hash(), block.hash());
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[test]
    fn insert_source_then_drain_round_trips_block() {
        let (_dir, store) = open_store();
        let cache = UncheckedCache::new(&store);
        let source = Hash::new([9; 32]);
        let block = open_block(source);

        cache.insert_source(source, &block, 1_000).unwrap();
        let drained = cache.drain(&source).unwrap();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].hash(), block.hash());
    }

    #[test]
    fn drain_unknown_dependency_returns_empty() {
        let (_dir, store) = open_store();
        let cache = UncheckedCache::new(&store);
        assert!(cache.drain(&Hash::new([0xAB; 32])).unwrap().is_empty());
    }

    #[test]
    fn multiple_blocks_can_wait_on_same_dependency() {
        let (_dir, store) = open_store();
        let cache = UncheckedCache::new(&store);
        let previous = Hash::new([1; 32]);

        let a = send_block(previous);
        let b = Block::Send(SendBlock {
            previous,
            destination: Account::new([5; 32]),
            balance: Amount::new(200),
            signature: Signature::ZERO,
            work: WorkNonce(0),
        });

        cache.insert_previous(previous, &a, 1_000).unwrap();
        cache.insert_previous(previous, &b, 1_001).unwrap();
        assert_eq!(cache.len().unwrap(), 2);

        let drained = cache.drain(&previous).unwrap();
        assert_eq!(drained.len(), 2);
    }

    #[test]
    fn drop_expired_removes_only_old_entries() {
        let (_dir, store) = open_store();
        let cache = UncheckedCache::new(&store);
        let dep_old = Hash::new([1; 32]);
        let dep_new = Hash::new([2; 32]);

        cache.insert_previous(dep_old, &send_block(dep_old), 100).unwrap();
        cache.insert_previous(dep_new, &send_block(dep_new), 10_000).unwrap();

        let dropped = cache.drop_expired(5_000).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn empty_cache_reports_empty() {
        let (_dir, store) = open_store();
        let cache = UncheckedCache::new(&store);
        assert!(cache.is_empty().unwrap());
    }
}
