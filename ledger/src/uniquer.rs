//! Block and vote uniquing — §3 "Uniquer: dedupes in-flight blocks/votes by
//! hash so only one canonical instance is held in memory; returns an
//! existing instance or registers a new one."
//!
//! Many arcs of the network receive the same block or vote from several
//! peers at once; without uniquing each arrival would allocate its own
//! copy and the processor would compare them for equality instead of
//! sharing one `Arc`. Entries are held by `Weak` reference only — once
//! every strong holder (the processor's queue, an open vote, ...) drops
//! its `Arc`, the slot is free and a later arrival for the same hash
//! allocates fresh rather than resurrecting a `Weak` that no longer points
//! at anything live.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use calyx_types::Hash;

use crate::block::Block;
use crate::vote::Vote;

/// How many cleanup cycles to let expired `Weak` slots accumulate before
/// sweeping them out. Sweeping on every insert would make uniquing itself
/// a hot-path cost; this amortizes it.
const CLEANUP_INTERVAL: usize = 4096;

struct UniquerTable<T> {
    entries: Mutex<HashMap<Hash, Weak<T>>>,
    inserts_since_cleanup: Mutex<usize>,
}

impl<T> UniquerTable<T> {
    fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()), inserts_since_cleanup: Mutex::new(0) }
    }

    fn unique(&self, key: Hash, make: impl FnOnce() -> T) -> Arc<T> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(existing) = entries.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        let arc = Arc::new(make());
        entries.insert(key, Arc::downgrade(&arc));
        drop(entries);

        let mut counter = self.inserts_since_cleanup.lock().unwrap();
        *counter += 1;
        if *counter >= CLEANUP_INTERVAL {
            *counter = 0;
            drop(counter);
            self.sweep();
        }
        arc
    }

    fn sweep(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, weak| weak.strong_count() > 0);
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Dedupes live [`Block`] instances by their canonical hash.
pub struct BlockUniquer {
    table: UniquerTable<Block>,
}

impl BlockUniquer {
    pub fn new() -> Self {
        Self { table: UniquerTable::new() }
    }

    /// Return the canonical `Arc<Block>` for `hash`, registering `block`
    /// as that canonical instance if none is currently live.
    pub fn unique(&self, hash: Hash, block: Block) -> Arc<Block> {
        self.table.unique(hash, || block)
    }

    /// Number of blocks currently tracked (upper bound — may include
    /// slots not yet swept after their last strong reference dropped).
    pub fn size(&self) -> usize {
        self.table.len()
    }

    pub fn sweep(&self) {
        self.table.sweep();
    }
}

impl Default for BlockUniquer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dedupes live [`Vote`] instances, keyed by the vote's own hash (over its
/// signature — two votes for the same hash list from the same account at
/// different timestamps are distinct entries).
pub struct VoteUniquer {
    table: UniquerTable<Vote>,
}

impl VoteUniquer {
    pub fn new() -> Self {
        Self { table: UniquerTable::new() }
    }

    pub fn unique(&self, key: Hash, vote: Vote) -> Arc<Vote> {
        self.table.unique(key, || vote)
    }

    pub fn size(&self) -> usize {
        self.table.len()
    }

    pub fn sweep(&self) {
        self.table.sweep();
    }
}

impl Default for VoteUniquer {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a vote's signature to produce its uniquing key — distinct from
/// the hash list it covers, since the same account can cast several votes
/// over the same hashes at different timestamps.
pub fn vote_uniquing_key(vote: &Vote) -> Hash {
    calyx_crypto::hash_bytes(vote.signature.as_bytes())
}
