//! Pending-receive table.

use crate::StoreError;
use calyx_types::{Account, Amount, Hash};

/// Composite key: the receiving account and the hash of the source
/// (send) block that created the pending entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PendingKey {
    pub account: Account,
    pub hash: Hash,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PendingInfo {
    pub source: Account,
    pub amount: Amount,
    pub epoch: u8,
}

/// Trait for the `pending` table: (account, source_hash) → [`PendingInfo`].
pub trait PendingStore {
    fn get(&self, key: &PendingKey) -> Result<Option<PendingInfo>, StoreError>;
    fn put(&self, key: &PendingKey, info: &PendingInfo) -> Result<(), StoreError>;
    fn del(&self, key: &PendingKey) -> Result<(), StoreError>;
    fn exists(&self, key: &PendingKey) -> Result<bool, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;

    /// All pending entries for a single destination account, in key order.
    fn for_account(&self, account: &Account) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError>;

    fn begin(&self, start: Option<&PendingKey>) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError>;
}
