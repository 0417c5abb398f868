//! Final-vote table.
//!
//! Records, per election root, the block hash an online representative has
//! cast a *final* vote for — a durable guard against voting for two
//! different blocks at the same root after a restart.

use crate::StoreError;
use calyx_types::{Hash, Root};

/// Trait for the `final_vote` table: root → hash.
pub trait FinalVoteStore {
    fn get(&self, root: &Root) -> Result<Option<Hash>, StoreError>;

    /// Records `hash` for `root` unless a different hash is already
    /// recorded there, in which case the existing hash wins and is
    /// returned unchanged. Returns `true` if this call recorded a new
    /// entry.
    fn put(&self, root: &Root, hash: &Hash) -> Result<bool, StoreError>;

    fn del(&self, root: &Root) -> Result<(), StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
}
