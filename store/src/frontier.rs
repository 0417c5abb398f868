//! Legacy frontier table.
//!
//! Maps a legacy (pre-state-block) head hash back to its owning account.
//! State-block chains are looked up via [`crate::account::AccountStore`]
//! instead; this table exists only for legacy-block compatibility.

use crate::StoreError;
use calyx_types::{Account, Hash};

/// Trait for the `frontiers` table: head_hash → account.
pub trait FrontierStore {
    fn get(&self, hash: &Hash) -> Result<Option<Account>, StoreError>;
    fn put(&self, hash: &Hash, account: &Account) -> Result<(), StoreError>;
    fn del(&self, hash: &Hash) -> Result<(), StoreError>;
    fn begin(&self) -> Result<Vec<(Hash, Account)>, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
}
