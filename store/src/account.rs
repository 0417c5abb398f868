//! Account info table.

use crate::StoreError;
use calyx_types::{Account, Amount, Hash, Timestamp};

/// Per-account information, keyed by account.
///
/// `epoch` tracks the highest epoch the account's chain has upgraded to via
/// an epoch block; it gates which work threshold and signer new blocks on
/// the chain must satisfy.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccountInfo {
    /// Hash of the latest (head) block in this account's chain.
    pub head: Hash,
    /// The account's representative.
    pub representative: Account,
    /// Hash of this account's `open` block.
    pub open_block: Hash,
    pub balance: Amount,
    pub modified: Timestamp,
    pub block_count: u64,
    pub epoch: u8,
}

/// Trait for the `account` table: account → [`AccountInfo`].
pub trait AccountStore {
    fn get(&self, account: &Account) -> Result<Option<AccountInfo>, StoreError>;
    fn put(&self, account: &Account, info: &AccountInfo) -> Result<(), StoreError>;
    fn del(&self, account: &Account) -> Result<(), StoreError>;
    fn exists(&self, account: &Account) -> Result<bool, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;

    /// Ordered iteration starting at the first account ≥ `start`, or from
    /// the beginning of the table when `start` is `None`.
    fn begin(&self, start: Option<&Account>) -> Result<Vec<(Account, AccountInfo)>, StoreError>;
}
