//! Confirmation height table.

use crate::StoreError;
use calyx_types::{Account, Hash};

/// How far an account's chain has been cemented: `height` is the block
/// count up to and including `frontier`, the hash of the highest cemented
/// block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConfirmationHeightInfo {
    pub height: u64,
    pub frontier: Hash,
}

/// Trait for the `confirmation_height` table: account → [`ConfirmationHeightInfo`].
pub trait ConfirmationHeightStore {
    fn get(&self, account: &Account) -> Result<Option<ConfirmationHeightInfo>, StoreError>;
    fn put(&self, account: &Account, info: &ConfirmationHeightInfo) -> Result<(), StoreError>;
    fn del(&self, account: &Account) -> Result<(), StoreError>;
    fn exists(&self, account: &Account) -> Result<bool, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
}
