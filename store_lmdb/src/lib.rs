//! LMDB storage backend for the ledger.
//!
//! Implements every storage trait from `calyx-store` using the `heed` LMDB
//! bindings. Each logical table maps to one named LMDB database within a
//! single shared environment, so a `WriteBatch` commit spans all of them
//! atomically.

pub mod account;
pub mod block;
pub mod confirmation_height;
pub mod environment;
pub mod error;
pub mod final_vote;
pub mod frontier;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod online_weight;
pub mod peer;
pub mod pending;
pub mod pruned;
pub mod rep_weights;
pub mod store_impl;
pub mod unchecked;
pub mod write_batch;

pub use account::LmdbAccountStore;
pub use block::LmdbBlockStore;
pub use confirmation_height::LmdbConfirmationHeightStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use final_vote::LmdbFinalVoteStore;
pub use frontier::LmdbFrontierStore;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use meta::LmdbMetaStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use online_weight::LmdbOnlineWeightStore;
pub use peer::LmdbPeerStore;
pub use pending::LmdbPendingStore;
pub use pruned::LmdbPrunedStore;
pub use rep_weights::LmdbRepWeightStore;
pub use unchecked::LmdbUncheckedStore;
pub use write_batch::LmdbWriteBatch;

/// Convenience alias — the unified LMDB store wrapping all sub-stores.
pub type LmdbStore = LmdbEnvironment;
