//! Epoch upgrades — §3 "An ordered set of epoch upgrades; each epoch `e`
//! has a signer public key and a marker link value."
//!
//! A `state` block whose `link` equals the next epoch's marker and whose
//! balance is unchanged from its predecessor is an *epoch block*: it
//! raises the account's epoch without moving any value, gating which work
//! threshold and which signer later blocks on that chain must satisfy
//! (`work::thresholds::WorkBlockKind`).

use std::collections::BTreeMap;

use calyx_types::{Account, Hash};

/// The signer and marker link for one epoch upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochInfo {
    pub signer: Account,
    pub link: Hash,
}

/// The ordered table of epoch upgrades a network has defined, keyed by
/// epoch number (0 is the implicit pre-upgrade epoch and is never
/// registered here).
#[derive(Clone, Debug, Default)]
pub struct EpochSet {
    epochs: BTreeMap<u8, EpochInfo>,
}

impl EpochSet {
    pub fn new() -> Self {
        Self { epochs: BTreeMap::new() }
    }

    pub fn register(&mut self, epoch: u8, signer: Account, link: Hash) {
        self.epochs.insert(epoch, EpochInfo { signer, link });
    }

    pub fn info(&self, epoch: u8) -> Option<&EpochInfo> {
        self.epochs.get(&epoch)
    }

    pub fn signer(&self, epoch: u8) -> Option<Account> {
        self.epochs.get(&epoch).map(|e| e.signer)
    }

    /// The highest epoch number registered, or `0` if none.
    pub fn max_epoch(&self) -> u8 {
        self.epochs.keys().next_back().copied().unwrap_or(0)
    }

    /// `true` if `link` is the marker for some registered epoch strictly
    /// greater than `current_epoch` — the condition that makes a
    /// zero-balance-delta state block an epoch upgrade rather than a
    /// same-balance send-to-self.
    pub fn upgrade_epoch_for_link(&self, current_epoch: u8, link: &Hash) -> Option<u8> {
        self.epochs
            .iter()
            .find(|(&epoch, info)| epoch > current_epoch && info.link == *link)
            .map(|(&epoch, _)| epoch)
    }
}
