//! Abstract storage traits for the ledger.
//!
//! Ten transactional key-value tables (§4.4) plus a representative-weight
//! index — no concrete backend lives here. `calyx-store-lmdb` implements
//! these traits against `heed`; test doubles implement them in-memory.
//! Value types that would otherwise pull in the block wire codec
//! (`blocks`, `unchecked`) are stored as opaque bytes instead, so this
//! crate has no dependency on `calyx-ledger`.

pub mod account;
pub mod block;
pub mod confirmation_height;
pub mod error;
pub mod final_vote;
pub mod frontier;
pub mod meta;
pub mod online_weight;
pub mod peer;
pub mod pending;
pub mod pruned;
pub mod store;
pub mod unchecked;
pub mod write_batch;

pub use account::{AccountInfo, AccountStore};
pub use block::BlockStore;
pub use confirmation_height::{ConfirmationHeightInfo, ConfirmationHeightStore};
pub use error::StoreError;
pub use final_vote::FinalVoteStore;
pub use frontier::FrontierStore;
pub use meta::MetaStore;
pub use online_weight::OnlineWeightStore;
pub use peer::PeerStore;
pub use pending::{PendingInfo, PendingKey, PendingStore};
pub use pruned::PrunedStore;
pub use store::Store;
pub use unchecked::{UncheckedInfo, UncheckedKey, UncheckedStore};
pub use write_batch::{RepWeightStore, WriteBatch};
