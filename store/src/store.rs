//! Composite store trait tying every table together under one environment.

use crate::{
    AccountStore, BlockStore, ConfirmationHeightStore, FinalVoteStore, FrontierStore, MetaStore,
    OnlineWeightStore, PeerStore, PendingStore, PrunedStore, RepWeightStore, StoreError,
    UncheckedStore, WriteBatch,
};

/// The ledger's full set of transactional tables (§4.4).
///
/// Point reads and ordered scans (`begin`) are snapshot reads that may run
/// concurrently with the single writer. Multi-table mutations go through
/// [`Store::write_batch`], whose commit is the one place atomicity across
/// tables is guaranteed.
pub trait Store:
    AccountStore
    + BlockStore
    + PendingStore
    + ConfirmationHeightStore
    + FrontierStore
    + UncheckedStore
    + OnlineWeightStore
    + PeerStore
    + PrunedStore
    + FinalVoteStore
    + MetaStore
    + RepWeightStore
{
    /// Begin a new atomic write batch. Only one should be outstanding at a
    /// time; backends that require exclusive writers enforce this at the
    /// transaction layer.
    fn write_batch(&self) -> Result<Box<dyn WriteBatch + '_>, StoreError>;
}
