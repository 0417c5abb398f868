//! Per-account chain bookkeeping — §4.3 "every account's blocks form a
//! strictly contiguous chain: `height(n) = height(predecessor) + 1`, and
//! a chain's `previous`/`root` must point at the current head before a
//! new block is accepted."

use calyx_types::{Account, Hash};

use crate::block::Block;
use crate::error::LedgerError;

/// In-memory view of one account's chain: its identity, current head, and
/// length. The ledger keeps one of these per touched account during block
/// processing; persisted state lives in `calyx_store::AccountStore`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountChain {
    pub account: Account,
    pub head: Hash,
    pub block_count: u64,
}

impl AccountChain {
    pub fn new(account: Account, head: Hash, block_count: u64) -> Self {
        Self { account, head, block_count }
    }

    /// An account with no blocks yet — only an `open` can legally append
    /// to this (its `previous`/`root` is zero).
    pub fn empty(account: Account) -> Self {
        Self { account, head: Hash::ZERO, block_count: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.block_count == 0
    }

    /// Check that `block` may legally extend this chain: its root must
    /// equal the current head, and for variants that carry an explicit
    /// account field that field must match.
    pub fn validate_append(&self, block: &Block) -> Result<(), LedgerError> {
        if let Some(block_account) = block.account() {
            if block_account != self.account {
                return Err(LedgerError::InvalidBlock { reason: "block account does not match chain account".into() });
            }
        }

        if block.root() != self.head {
            return Err(LedgerError::BlockGap { previous: self.head.to_string() });
        }

        Ok(())
    }

    /// Append a block already validated by [`validate_append`], advancing
    /// the head and height.
    pub fn append(&mut self, hash: Hash) {
        self.head = hash;
        self.block_count += 1;
    }

    /// The height the next appended block must carry in its sideband.
    pub fn next_height(&self) -> u64 {
        self.block_count + 1
    }

    /// Roll the chain back to just before `hash`, which must be the
    /// current head — used when a competing block wins a fork and the
    /// loser's effects are undone (§4.5 rollback).
    pub fn rollback_head(&mut self, new_head: Hash) {
        self.head = new_head;
        self.block_count = self.block_count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calyx_types::{Amount, Signature, WorkNonce};

    fn state_block(account: Account, previous: Hash) -> Block {
        Block::State(crate::block::StateBlock {
            account,
            previous,
            representative: account,
            link: Hash::ZERO,
            balance: Amount::new(1),
            signature: Signature::ZERO,
            work: WorkNonce(1),
        })
    }

    #[test]
    fn empty_chain_accepts_block_rooted_at_zero() {
        let account = Account::new([1u8; 32]);
        let chain = AccountChain::empty(account);
        let block = state_block(account, Hash::ZERO);
        assert!(chain.validate_append(&block).is_ok());
        assert_eq!(chain.next_height(), 1);
    }

    #[test]
    fn append_advances_head_and_height() {
        let account = Account::new([1u8; 32]);
        let mut chain = AccountChain::empty(account);
        chain.append(Hash::new([9u8; 32]));
        assert_eq!(chain.head, Hash::new([9u8; 32]));
        assert_eq!(chain.block_count, 1);
        assert_eq!(chain.next_height(), 2);
    }

    #[test]
    fn rejects_block_not_rooted_at_head() {
        let account = Account::new([1u8; 32]);
        let mut chain = AccountChain::empty(account);
        chain.append(Hash::new([9u8; 32]));
        let block = state_block(account, Hash::new([8u8; 32]));
        assert!(matches!(chain.validate_append(&block), Err(LedgerError::BlockGap { .. })));
    }

    #[test]
    fn rejects_mismatched_account() {
        let account = Account::new([1u8; 32]);
        let chain = AccountChain::empty(account);
        let block = state_block(Account::new([2u8; 32]), Hash::ZERO);
        assert!(matches!(chain.validate_append(&block), Err(LedgerError::InvalidBlock { .. })));
    }

    #[test]
    fn rollback_head_decrements_count() {
        let account = Account::new([1u8; 32]);
        let mut chain = AccountChain::empty(account);
        chain.append(Hash::new([9u8; 32]));
        chain.rollback_head(Hash::ZERO);
        assert_eq!(chain.head, Hash::ZERO);
        assert_eq!(chain.block_count, 0);
    }
}
