//! Cross-table atomic write batch.
//!
//! The single-writer block processor needs one commit to cover several
//! tables at once — insert a block, advance a frontier, update account
//! info, consume or create a pending entry — with no partial state
//! observable if the process dies mid-write. `WriteBatch` groups those
//! operations into one underlying write transaction; dropping a batch
//! without calling [`WriteBatch::commit`] rolls everything back.
use crate::account::AccountInfo;
use crate::pending::{PendingInfo, PendingKey};
use crate::StoreError;
use calyx_types::{Account, Amount, Hash};

pub trait WriteBatch {
    fn put_block(&mut self, hash: &Hash, block_bytes: &[u8]) -> Result<(), StoreError>;
    fn delete_block(&mut self, hash: &Hash) -> Result<(), StoreError>;

    fn put_frontier(&mut self, hash: &Hash, account: &Account) -> Result<(), StoreError>;
    fn delete_frontier(&mut self, hash: &Hash) -> Result<(), StoreError>;

    fn put_account(&mut self, account: &Account, info: &AccountInfo) -> Result<(), StoreError>;
    fn delete_account(&mut self, account: &Account) -> Result<(), StoreError>;

    fn put_pending(&mut self, key: &PendingKey, info: &PendingInfo) -> Result<(), StoreError>;
    fn delete_pending(&mut self, key: &PendingKey) -> Result<(), StoreError>;

    fn put_rep_weight_delta(&mut self, representative: &Account, delta: i128) -> Result<(), StoreError>;

    fn put_confirmation_height(&mut self, account: &Account, height: u64, frontier: &Hash) -> Result<(), StoreError>;

    fn put_pruned(&mut self, hash: &Hash) -> Result<(), StoreError>;

    /// Commit every batched operation in a single atomic write transaction.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Exposes the total weight currently attributed to a representative,
/// maintained incrementally by [`WriteBatch::put_rep_weight_delta`].
pub trait RepWeightStore {
    fn weight(&self, representative: &Account) -> Result<Amount, StoreError>;
    fn begin(&self) -> Result<Vec<(Account, Amount)>, StoreError>;
}
