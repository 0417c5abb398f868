//! Implements the composite [`calyx_store::Store`] trait for
//! [`LmdbEnvironment`] by delegating each call to a freshly constructed
//! sub-store. Sub-stores are cheap — each just clones the shared `Arc<Env>`
//! and copies a `Database` handle — so there's no overhead to constructing
//! one per call rather than caching it.

use calyx_store::account::{AccountInfo, AccountStore};
use calyx_store::block::BlockStore;
use calyx_store::confirmation_height::{ConfirmationHeightInfo, ConfirmationHeightStore};
use calyx_store::final_vote::FinalVoteStore;
use calyx_store::frontier::FrontierStore;
use calyx_store::meta::MetaStore;
use calyx_store::online_weight::OnlineWeightStore;
use calyx_store::peer::PeerStore;
use calyx_store::pending::{PendingInfo, PendingKey, PendingStore};
use calyx_store::pruned::PrunedStore;
use calyx_store::unchecked::{UncheckedInfo, UncheckedKey, UncheckedStore};
use calyx_store::write_batch::{RepWeightStore, WriteBatch};
use calyx_store::{Store, StoreError};
use calyx_types::{Account, Amount, Hash, Root};

use crate::environment::LmdbEnvironment;

impl AccountStore for LmdbEnvironment {
    fn get(&self, account: &Account) -> Result<Option<AccountInfo>, StoreError> {
        self.account_store().get(account)
    }
    fn put(&self, account: &Account, info: &AccountInfo) -> Result<(), StoreError> {
        self.account_store().put(account, info)
    }
    fn del(&self, account: &Account) -> Result<(), StoreError> {
        self.account_store().del(account)
    }
    fn exists(&self, account: &Account) -> Result<bool, StoreError> {
        self.account_store().exists(account)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.account_store().count()
    }
    fn begin(&self, start: Option<&Account>) -> Result<Vec<(Account, AccountInfo)>, StoreError> {
        self.account_store().begin(start)
    }
}

impl BlockStore for LmdbEnvironment {
    fn put(&self, hash: &Hash, block_bytes: &[u8]) -> Result<(), StoreError> {
        self.block_store().put(hash, block_bytes)
    }
    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        self.block_store().get(hash)
    }
    fn del(&self, hash: &Hash) -> Result<(), StoreError> {
        self.block_store().del(hash)
    }
    fn exists(&self, hash: &Hash) -> Result<bool, StoreError> {
        self.block_store().exists(hash)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.block_store().count()
    }
    fn successor(&self, hash: &Hash) -> Result<Option<Hash>, StoreError> {
        self.block_store().successor(hash)
    }
    fn account(&self, hash: &Hash) -> Result<Option<Account>, StoreError> {
        self.block_store().account(hash)
    }
}

impl PendingStore for LmdbEnvironment {
    fn get(&self, key: &PendingKey) -> Result<Option<PendingInfo>, StoreError> {
        self.pending_store().get(key)
    }
    fn put(&self, key: &PendingKey, info: &PendingInfo) -> Result<(), StoreError> {
        self.pending_store().put(key, info)
    }
    fn del(&self, key: &PendingKey) -> Result<(), StoreError> {
        self.pending_store().del(key)
    }
    fn exists(&self, key: &PendingKey) -> Result<bool, StoreError> {
        self.pending_store().exists(key)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.pending_store().count()
    }
    fn for_account(&self, account: &Account) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError> {
        self.pending_store().for_account(account)
    }
    fn begin(&self, start: Option<&PendingKey>) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError> {
        self.pending_store().begin(start)
    }
}

impl ConfirmationHeightStore for LmdbEnvironment {
    fn get(&self, account: &Account) -> Result<Option<ConfirmationHeightInfo>, StoreError> {
        self.confirmation_height_store().get(account)
    }
    fn put(&self, account: &Account, info: &ConfirmationHeightInfo) -> Result<(), StoreError> {
        self.confirmation_height_store().put(account, info)
    }
    fn del(&self, account: &Account) -> Result<(), StoreError> {
        self.confirmation_height_store().del(account)
    }
    fn exists(&self, account: &Account) -> Result<bool, StoreError> {
        self.confirmation_height_store().exists(account)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.confirmation_height_store().count()
    }
}

impl FrontierStore for LmdbEnvironment {
    fn get(&self, hash: &Hash) -> Result<Option<Account>, StoreError> {
        self.frontier_store().get(hash)
    }
    fn put(&self, hash: &Hash, account: &Account) -> Result<(), StoreError> {
        self.frontier_store().put(hash, account)
    }
    fn del(&self, hash: &Hash) -> Result<(), StoreError> {
        self.frontier_store().del(hash)
    }
    fn begin(&self) -> Result<Vec<(Hash, Account)>, StoreError> {
        self.frontier_store().begin()
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.frontier_store().count()
    }
}

impl UncheckedStore for LmdbEnvironment {
    fn put(&self, key: &UncheckedKey, info: &UncheckedInfo) -> Result<(), StoreError> {
        self.unchecked_store().put(key, info)
    }
    fn del(&self, key: &UncheckedKey) -> Result<(), StoreError> {
        self.unchecked_store().del(key)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.unchecked_store().count()
    }
    fn get(&self, dependency: &Hash) -> Result<Vec<(UncheckedKey, UncheckedInfo)>, StoreError> {
        self.unchecked_store().get(dependency)
    }
    fn drop_expired(&self, cutoff: u64) -> Result<usize, StoreError> {
        self.unchecked_store().drop_expired(cutoff)
    }
}

impl OnlineWeightStore for LmdbEnvironment {
    fn put(&self, time_ms: u64, weight: Amount) -> Result<(), StoreError> {
        self.online_weight_store().put(time_ms, weight)
    }
    fn del(&self, time_ms: u64) -> Result<(), StoreError> {
        self.online_weight_store().del(time_ms)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.online_weight_store().count()
    }
    fn begin(&self) -> Result<Vec<(u64, Amount)>, StoreError> {
        self.online_weight_store().begin()
    }
    fn trim(&self, max_samples: usize) -> Result<usize, StoreError> {
        self.online_weight_store().trim(max_samples)
    }
}

impl PeerStore for LmdbEnvironment {
    fn put(&self, endpoint: &str) -> Result<(), StoreError> {
        self.peer_store().put(endpoint)
    }
    fn del(&self, endpoint: &str) -> Result<(), StoreError> {
        self.peer_store().del(endpoint)
    }
    fn exists(&self, endpoint: &str) -> Result<bool, StoreError> {
        self.peer_store().exists(endpoint)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.peer_store().count()
    }
    fn begin(&self) -> Result<Vec<String>, StoreError> {
        self.peer_store().begin()
    }
    fn clear(&self) -> Result<(), StoreError> {
        self.peer_store().clear()
    }
}

impl PrunedStore for LmdbEnvironment {
    fn put(&self, hash: &Hash) -> Result<(), StoreError> {
        self.pruned_store().put(hash)
    }
    fn del(&self, hash: &Hash) -> Result<(), StoreError> {
        self.pruned_store().del(hash)
    }
    fn exists(&self, hash: &Hash) -> Result<bool, StoreError> {
        self.pruned_store().exists(hash)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.pruned_store().count()
    }
}

impl FinalVoteStore for LmdbEnvironment {
    fn get(&self, root: &Root) -> Result<Option<Hash>, StoreError> {
        self.final_vote_store().get(root)
    }
    fn put(&self, root: &Root, hash: &Hash) -> Result<bool, StoreError> {
        self.final_vote_store().put(root, hash)
    }
    fn del(&self, root: &Root) -> Result<(), StoreError> {
        self.final_vote_store().del(root)
    }
    fn count(&self) -> Result<u64, StoreError> {
        self.final_vote_store().count()
    }
}

impl MetaStore for LmdbEnvironment {
    fn put(&self, key: u32, value: &[u8]) -> Result<(), StoreError> {
        self.meta_store().put(key, value)
    }
    fn get(&self, key: u32) -> Result<Option<Vec<u8>>, StoreError> {
        self.meta_store().get(key)
    }
    fn del(&self, key: u32) -> Result<(), StoreError> {
        self.meta_store().del(key)
    }
}

impl RepWeightStore for LmdbEnvironment {
    fn weight(&self, representative: &Account) -> Result<Amount, StoreError> {
        self.rep_weight_store().weight(representative)
    }
    fn begin(&self) -> Result<Vec<(Account, Amount)>, StoreError> {
        RepWeightStore::begin(&self.rep_weight_store())
    }
}

impl Store for LmdbEnvironment {
    fn write_batch(&self) -> Result<Box<dyn WriteBatch + '_>, StoreError> {
        Ok(Box::new(LmdbEnvironment::write_batch(self)?))
    }
}
