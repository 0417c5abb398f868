//! Block processing pipeline (§4.5).
//!
//! Converts a stream of candidate blocks from heterogeneous sources into a
//! consistent ledger under single-writer semantics. Grounded on the
//! teacher's `ProcessingQueue` (two `VecDeque`s gated by a capacity) and
//! `ledger_event::EventBus` (`Vec<Box<dyn Fn(&T) + Send + Sync>>` observer
//! lists), generalised to the spec's two-FIFO `blocks`/`forced` queue and
//! its `block_processed`/`batch_processed`/`rolled_back` observer contract.
//!
//! `process_one` commits its own write batch per block rather than sharing
//! one write transaction across an entire scheduler batch — a disclosed
//! simplification (see `DESIGN.md`) that keeps per-block atomicity (the
//! hard correctness invariant) while relaxing the cross-block batching
//! optimisation described in §4.5's "acquires one write transaction" per
//! batch wording.

use std::collections::VecDeque;
use std::sync::Mutex;

use calyx_crypto::verify;
use calyx_ledger::epoch::EpochSet;
use calyx_ledger::sideband::{decode_stored, encode_stored, BlockDetails, Sideband};
use calyx_ledger::Block;
use calyx_store::{AccountInfo, BlockStore, PendingInfo, PendingKey, Store, WriteBatch};
use calyx_types::{Account, Amount, Hash, Timestamp};
use calyx_work::thresholds::WorkThresholds;
use calyx_work::validator::validate_work;

use crate::error::NodeError;
use crate::unchecked::UncheckedCache;

/// Where a candidate block came from — informs gap-handling and logging,
/// distinct from `forced` (fork-override priority), which any source may
/// carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockSource {
    Live,
    LegacyBootstrap,
    LazyBootstrap,
    UncheckedReplay,
    LocalGeneration,
}

/// A candidate block awaiting processing, together with its provenance.
#[derive(Clone, Debug)]
pub struct BlockContext {
    pub block: Block,
    pub source: BlockSource,
    /// Fork-override priority: bypasses the work check and rolls back a
    /// competing block instead of returning `fork`.
    pub forced: bool,
}

impl BlockContext {
    pub fn new(block: Block, source: BlockSource) -> Self {
        Self { block, source, forced: false }
    }

    pub fn forced(block: Block) -> Self {
        Self { block, source: BlockSource::LocalGeneration, forced: true }
    }
}

/// The full §4.5 status taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessingStatus {
    Progress,
    Old,
    BadSignature,
    NegativeSpend,
    Unreceivable,
    GapPrevious,
    GapSource,
    GapEpochOpenPending,
    OpenedBurnAccount,
    BalanceMismatch,
    RepresentativeMismatch,
    BlockPosition,
    InsufficientWork,
    Fork,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Progress => "progress",
            ProcessingStatus::Old => "old",
            ProcessingStatus::BadSignature => "bad_signature",
            ProcessingStatus::NegativeSpend => "negative_spend",
            ProcessingStatus::Unreceivable => "unreceivable",
            ProcessingStatus::GapPrevious => "gap_previous",
            ProcessingStatus::GapSource => "gap_source",
            ProcessingStatus::GapEpochOpenPending => "gap_epoch_open_pending",
            ProcessingStatus::OpenedBurnAccount => "opened_burn_account",
            ProcessingStatus::BalanceMismatch => "balance_mismatch",
            ProcessingStatus::RepresentativeMismatch => "representative_mismatch",
            ProcessingStatus::BlockPosition => "block_position",
            ProcessingStatus::InsufficientWork => "insufficient_work",
            ProcessingStatus::Fork => "fork",
        }
    }

    fn is_gap(&self) -> bool {
        matches!(self, ProcessingStatus::GapPrevious | ProcessingStatus::GapSource)
    }
}

/// The outcome of one `process_one` call: the status, any blocks that were
/// rolled back to make room for a forced block, and any previously-unchecked
/// blocks that are now eligible for re-submission.
pub struct ProcessOutcome {
    pub status: ProcessingStatus,
    pub rolled_back: Vec<Block>,
    pub unblocked: Vec<Block>,
}

/// Burn account: state blocks opening this account are rejected outright,
/// matching the network-wide convention that the all-zero account can never
/// hold funds.
const BURN_ACCOUNT: Account = Account::ZERO;

const DEFAULT_ROLLBACK_DEPTH_LIMIT: usize = 4_096;

/// Validate, apply, and sideband one block against `store`. Pure enough to
/// unit-test directly: takes every dependency as a parameter rather than
/// reading from a shared `BlockProcessor` so tests can drive it against a
/// bare `calyx-store-lmdb` instance with no queue or worker thread involved.
pub fn process_one<S: Store>(
    store: &S,
    thresholds: &WorkThresholds,
    epochs: &EpochSet,
    now: u64,
    ctx: &BlockContext,
) -> Result<ProcessOutcome, NodeError> {
    let block = &ctx.block;
    let hash = block.hash();

    if BlockStore::exists(store, &hash)? {
        return Ok(no_op(ProcessingStatus::Old));
    }

    let previous = block.previous();
    let account = match block.account() {
        Some(account) => account,
        None => match previous.and_then(|p| BlockStore::account(store, &p).transpose()) {
            Some(Ok(account)) => account,
            Some(Err(e)) => return Err(e.into()),
            None => {
                let cache = UncheckedCache::new(store);
                cache.insert_previous(previous.unwrap_or(Hash::ZERO), block, now)?;
                return Ok(no_op(ProcessingStatus::GapPrevious));
            }
        },
    };

    let account_info = calyx_store::AccountStore::get(store, &account)?;

    if let Some(prev) = previous {
        if !BlockStore::exists(store, &prev)? {
            let cache = UncheckedCache::new(store);
            cache.insert_previous(prev, block, now)?;
            return Ok(no_op(ProcessingStatus::GapPrevious));
        }
    }

    if account_info.is_none() && previous.is_some() {
        return Ok(no_op(ProcessingStatus::GapPrevious));
    }

    if matches!(block, Block::Open(_)) && account == BURN_ACCOUNT {
        return Ok(no_op(ProcessingStatus::OpenedBurnAccount));
    }
    if let Block::State(b) = block {
        if previous.is_none() && b.account == BURN_ACCOUNT {
            return Ok(no_op(ProcessingStatus::OpenedBurnAccount));
        }
    }

    // Fork detection (and, if forced, rollback) happens before any balance
    // or representative is computed below: a forced block replacing a
    // losing competitor must see the state `rollback_from` restores, not a
    // snapshot taken before the losing chain was undone.
    let mut rolled_back = Vec::new();
    if let Some(prev) = previous {
        match BlockStore::successor(store, &prev)? {
            Some(existing) if existing != hash => {
                if !ctx.forced {
                    return Ok(no_op(ProcessingStatus::Fork));
                }
                rolled_back = rollback_from(store, existing, DEFAULT_ROLLBACK_DEPTH_LIMIT)?;
            }
            None => {
                if let Some(info) = &account_info {
                    if prev != info.head {
                        return Ok(no_op(ProcessingStatus::BlockPosition));
                    }
                }
            }
            _ => {}
        }
    } else if let Some(info) = &account_info {
        if ctx.forced {
            rolled_back = rollback_from(store, info.open_block, DEFAULT_ROLLBACK_DEPTH_LIMIT)?;
        } else {
            return Ok(no_op(ProcessingStatus::Fork));
        }
    }

    let account_info = if rolled_back.is_empty() {
        account_info
    } else {
        calyx_store::AccountStore::get(store, &account)?
    };
    let old_balance = account_info.as_ref().map(|i| i.balance).unwrap_or(Amount::ZERO);
    let old_representative = account_info.as_ref().map(|i| i.representative);
    let old_epoch = account_info.as_ref().map(|i| i.epoch).unwrap_or(0);

    // Resolve the source block for receive-shaped blocks (legacy `receive`,
    // legacy `open`, or a `state` block whose link names a pending entry).
    let source_hash = match block {
        Block::Receive(b) => Some(b.source),
        Block::Open(b) => Some(b.source),
        Block::State(b) if !b.link.is_zero() && b.balance >= old_balance => Some(b.link),
        _ => None,
    };

    let pending_key = source_hash.map(|source| PendingKey { account, hash: source });
    let pending_entry = match &pending_key {
        Some(key) => calyx_store::PendingStore::get(store, key)?,
        None => None,
    };

    // `state` blocks are ambiguous between "receive" and "same-balance
    // epoch upgrade" purely from the balance delta; disambiguate via the
    // registered epoch markers before committing to the gap_source path.
    let is_epoch_block = matches!(block, Block::State(b) if b.balance == old_balance)
        && matches!(block, Block::State(b) if epochs.upgrade_epoch_for_link(old_epoch, &b.link).is_some());

    if let Some(key) = &pending_key {
        if pending_entry.is_none() && !is_epoch_block {
            let cache = UncheckedCache::new(store);
            cache.insert_source(key.hash, block, now)?;
            return Ok(no_op(ProcessingStatus::GapSource));
        }
    }

    if is_epoch_block {
        let link = match block {
            Block::State(b) => b.link,
            _ => unreachable!(),
        };
        let target_epoch = epochs.upgrade_epoch_for_link(old_epoch, &link).unwrap();
        if previous.is_none() {
            // An epoch block can never be the opening block of a chain.
            return Ok(no_op(ProcessingStatus::GapEpochOpenPending));
        }
        return apply_state_epoch(store, thresholds, epochs, now, ctx, account, account_info.as_ref(), target_epoch, rolled_back);
    }

    let is_send = match block {
        Block::Send(_) => true,
        Block::State(b) => b.balance < old_balance,
        _ => false,
    };
    let is_receive = pending_key.is_some();

    let new_balance = match block {
        Block::Send(b) => {
            if account_info.is_none() || b.balance > old_balance {
                return Ok(no_op(ProcessingStatus::NegativeSpend));
            }
            b.balance
        }
        Block::Receive(_) | Block::Open(_) => {
            let info = pending_entry.as_ref().unwrap();
            old_balance.checked_add(info.amount).ok_or(NodeError::Other("balance overflow".into()))?
        }
        Block::Change(_) => old_balance,
        Block::State(b) => {
            if is_send && b.link.is_zero() {
                return Ok(no_op(ProcessingStatus::BalanceMismatch));
            }
            if is_receive {
                let info = pending_entry.as_ref().unwrap();
                let expected = old_balance.checked_add(info.amount).unwrap_or(Amount::ZERO);
                if b.balance != expected {
                    return Ok(no_op(ProcessingStatus::BalanceMismatch));
                }
            }
            b.balance
        }
    };

    if is_receive {
        if let Some(info) = &pending_entry {
            if matches!(block, Block::Receive(_) | Block::Open(_)) {
                // legacy variants have no balance field to cross-check beyond the addition above.
                let _ = info;
            }
        }
    }

    let new_representative = match block {
        Block::Open(b) => b.representative,
        Block::Change(b) => b.representative,
        Block::State(b) => b.representative,
        _ => old_representative.unwrap_or(Account::ZERO),
    };
    if matches!(block, Block::Change(_)) {
        if let Some(info) = &account_info {
            if info.representative == new_representative {
                return Ok(no_op(ProcessingStatus::RepresentativeMismatch));
            }
        }
    }

    let details = BlockDetails { epoch: old_epoch, is_send, is_receive, is_epoch: false };
    let work_threshold = thresholds.select(old_epoch, is_send, is_receive);
    if !ctx.forced && !validate_work(&block.root(), block.work(), work_threshold) {
        return Ok(no_op(ProcessingStatus::InsufficientWork));
    }

    // Epoch-upgrade blocks never reach this point (they're dispatched to
    // `apply_state_epoch` above), so the signer here is always the account
    // itself, never an epoch-authority key.
    if !verify(sign_message(block).as_bytes(), block.signature(), &account) {
        return Ok(no_op(ProcessingStatus::BadSignature));
    }

    if matches!(block, Block::Receive(_) | Block::Open(_) | Block::State(_)) && is_receive && pending_entry.is_none() {
        return Ok(no_op(ProcessingStatus::Unreceivable));
    }

    let height = account_info.as_ref().map(|i| i.block_count + 1).unwrap_or(1);
    let new_account_info = AccountInfo {
        head: hash,
        representative: new_representative,
        open_block: account_info.as_ref().map(|i| i.open_block).unwrap_or(hash),
        balance: new_balance,
        modified: Timestamp::new(now),
        block_count: height,
        epoch: old_epoch,
    };

    {
        let mut batch = store.write_batch()?;
        if let Some(prev) = previous {
            if let Some(prev_bytes) = BlockStore::get(store, &prev)? {
                let (mut prev_sideband, prev_block) = decode_stored(&prev_bytes)?;
                prev_sideband.successor = hash;
                batch.put_block(&prev, &encode_stored(&prev_sideband, &prev_block))?;
            }
        }

        let sideband = Sideband {
            height,
            timestamp: now,
            successor: Hash::ZERO,
            account,
            balance: match block {
                Block::State(_) => None,
                _ => Some(new_balance),
            },
            details,
            source_epoch: pending_entry.as_ref().map(|p| p.epoch).unwrap_or(0),
        };
        batch.put_block(&hash, &encode_stored(&sideband, block))?;
        batch.put_account(&account, &new_account_info)?;

        if matches!(block, Block::Send(_) | Block::Receive(_) | Block::Open(_) | Block::Change(_)) {
            if let Some(prev) = previous {
                batch.delete_frontier(&prev)?;
            }
            batch.put_frontier(&hash, &account)?;
        }

        if is_send {
            let destination = match block {
                Block::Send(b) => b.destination,
                Block::State(b) => Account::new(*b.link.as_bytes()),
                _ => unreachable!(),
            };
            let amount = old_balance.checked_sub(new_balance).ok_or(NodeError::Other("send underflow".into()))?;
            batch.put_pending(
                &PendingKey { account: destination, hash },
                &PendingInfo { source: account, amount, epoch: old_epoch },
            )?;
        } else if let Some(key) = &pending_key {
            batch.delete_pending(key)?;
        }

        move_weight(
            batch.as_mut(),
            old_representative.map(|r| (r, old_balance)),
            Some((new_representative, new_balance)),
        )?;

        batch.commit()?;
    }

    let cache = UncheckedCache::new(store);
    let unblocked = cache.drain(&hash)?;

    Ok(ProcessOutcome { status: ProcessingStatus::Progress, rolled_back, unblocked })
}

/// `state` epoch-upgrade blocks skip the send/receive balance machinery
/// entirely: the balance is unchanged, nothing moves, and the only effect
/// is raising `account_info.epoch`.
///
/// Callers dispatch here only after `process_one` has already resolved any
/// fork on `previous` (rolling it back if forced, rejecting otherwise) and
/// refreshed `account_info` accordingly — `rolled_back` carries whatever
/// that resolution undid, to fold into the returned outcome. Re-deriving
/// any of that here would be redundant: `previous` is the same value
/// `process_one` already checked against the store.
fn apply_state_epoch<S: Store>(
    store: &S,
    thresholds: &WorkThresholds,
    epochs: &EpochSet,
    now: u64,
    ctx: &BlockContext,
    account: Account,
    account_info: Option<&AccountInfo>,
    target_epoch: u8,
    rolled_back: Vec<Block>,
) -> Result<ProcessOutcome, NodeError> {
    let block = &ctx.block;
    let hash = block.hash();
    let (previous, representative, balance) = match block {
        Block::State(b) => (b.previous, b.representative, b.balance),
        _ => unreachable!(),
    };

    let work_threshold = thresholds.select(target_epoch, false, true);
    if !ctx.forced && !validate_work(&block.root(), block.work(), work_threshold) {
        return Ok(no_op(ProcessingStatus::InsufficientWork));
    }

    let signer = epochs.signer(target_epoch).unwrap_or(account);
    if !verify(sign_message(block).as_bytes(), block.signature(), &signer) {
        return Ok(no_op(ProcessingStatus::BadSignature));
    }

    let height = account_info.map(|i| i.block_count + 1).unwrap_or(1);
    let new_account_info = AccountInfo {
        head: hash,
        representative,
        open_block: account_info.map(|i| i.open_block).unwrap_or(hash),
        balance,
        modified: Timestamp::new(now),
        block_count: height,
        epoch: target_epoch,
    };

    {
        let mut batch = store.write_batch()?;
        if let Some(prev_bytes) = BlockStore::get(store, &previous)? {
            let (mut prev_sideband, prev_block) = decode_stored(&prev_bytes)?;
            prev_sideband.successor = hash;
            batch.put_block(&previous, &encode_stored(&prev_sideband, &prev_block))?;
        }
        let sideband = Sideband {
            height,
            timestamp: now,
            successor: Hash::ZERO,
            account,
            balance: None,
            details: BlockDetails { epoch: target_epoch, is_send: false, is_receive: false, is_epoch: true },
            source_epoch: 0,
        };
        batch.put_block(&hash, &encode_stored(&sideband, block))?;
        batch.put_account(&account, &new_account_info)?;
        if let Some(info) = account_info {
            if info.representative != representative {
                move_weight(batch.as_mut(), Some((info.representative, balance)), Some((representative, balance)))?;
            }
        }
        batch.commit()?;
    }

    let cache = UncheckedCache::new(store);
    let unblocked = cache.drain(&hash)?;
    Ok(ProcessOutcome { status: ProcessingStatus::Progress, rolled_back, unblocked })
}

fn no_op(status: ProcessingStatus) -> ProcessOutcome {
    ProcessOutcome { status, rolled_back: Vec::new(), unblocked: Vec::new() }
}

fn sign_message(block: &Block) -> Hash {
    block.hash()
}

/// Move a weight attribution from `old` to `new` (either side may be
/// `None`: no prior representative for a fresh account, or no successor
/// representative when an account chain is fully rolled back).
fn move_weight(
    batch: &mut dyn WriteBatch,
    old: Option<(Account, Amount)>,
    new: Option<(Account, Amount)>,
) -> Result<(), NodeError> {
    if let Some((rep, amount)) = old {
        if !amount.is_zero() {
            batch.put_rep_weight_delta(&rep, -(amount.raw() as i128))?;
        }
    }
    if let Some((rep, amount)) = new {
        if !amount.is_zero() {
            batch.put_rep_weight_delta(&rep, amount.raw() as i128)?;
        }
    }
    Ok(())
}

/// Walk the representative of the chain ending at (and including) `hash`,
/// following `previous` links through non-carrying variants (`send`,
/// `receive`) until an `open`/`change`/`state` block supplies one directly.
/// Sideband doesn't persist representative (matching the teacher's nano
/// sideband field set), so this is the cost of recovering it during
/// rollback; bounded by `depth_limit` like the rest of the walk.
fn representative_as_of<S: Store>(store: &S, hash: &Hash, depth_limit: usize) -> Result<Account, NodeError> {
    let mut current = *hash;
    for _ in 0..depth_limit {
        let bytes = BlockStore::get(store, &current)?
            .ok_or_else(|| NodeError::Other("missing ancestor block during rollback".into()))?;
        let (_, block) = decode_stored(&bytes)?;
        match block {
            Block::Open(b) => return Ok(b.representative),
            Block::Change(b) => return Ok(b.representative),
            Block::State(b) => return Ok(b.representative),
            Block::Send(b) => current = b.previous,
            Block::Receive(b) => current = b.previous,
        }
    }
    Err(NodeError::RollbackDepthExceeded)
}

/// Roll back the chain starting at `first` (the losing competitor at a fork
/// point) through its own successors, deleting every block, reversing the
/// pending-entry effects of each, and restoring the account to the state it
/// held right before `first` was ever applied. Runs inside one write
/// transaction; returns the undone blocks tip-first (the order they were
/// removed in, matching the emission order of `rolled_back` observers).
fn rollback_from<S: Store>(store: &S, first: Hash, depth_limit: usize) -> Result<Vec<Block>, NodeError> {
    let mut chain = Vec::new();
    let mut current = first;
    loop {
        if chain.len() >= depth_limit {
            return Err(NodeError::RollbackDepthExceeded);
        }
        let bytes = BlockStore::get(store, &current)?
            .ok_or_else(|| NodeError::Other("missing block in fork chain".into()))?;
        let (sideband, block) = decode_stored(&bytes)?;
        let successor = sideband.successor;
        chain.push((current, sideband, block));
        if successor.is_zero() {
            break;
        }
        current = successor;
    }

    let account = chain[0].1.account;
    let existing_account_info = calyx_store::AccountStore::get(store, &account)?;
    let tip_sideband = &chain.last().unwrap().1;
    let tip_balance = tip_sideband.balance.unwrap_or_else(|| match &chain.last().unwrap().2 {
        Block::State(b) => b.balance,
        _ => Amount::ZERO,
    });
    let tip_representative = representative_as_of(store, &chain.last().unwrap().0, depth_limit)?;

    let fork_point_previous = chain[0].2.previous();
    let (restored_balance, restored_representative, restored_epoch) = match fork_point_previous {
        Some(prev) => {
            let bytes = BlockStore::get(store, &prev)?
                .ok_or_else(|| NodeError::Other("missing fork-point predecessor".into()))?;
            let (prev_sideband, prev_block) = decode_stored(&bytes)?;
            let balance = prev_sideband.balance.unwrap_or_else(|| match &prev_block {
                Block::State(b) => b.balance,
                _ => Amount::ZERO,
            });
            (balance, representative_as_of(store, &prev, depth_limit)?, prev_sideband.details.epoch)
        }
        None => (Amount::ZERO, Account::ZERO, 0),
    };

    let mut undone = Vec::with_capacity(chain.len());
    let mut batch = store.write_batch()?;

    for (hash, sideband, block) in &chain {
        batch.delete_block(hash)?;
        if matches!(block, Block::Send(_) | Block::Receive(_) | Block::Open(_) | Block::Change(_)) {
            batch.delete_frontier(hash)?;
        }
        match block {
            Block::Send(b) => {
                batch.delete_pending(&PendingKey { account: b.destination, hash: *hash })?;
            }
            Block::State(b) if sideband.details.is_send => {
                batch.delete_pending(&PendingKey { account: Account::new(*b.link.as_bytes()), hash: *hash })?;
            }
            Block::Receive(b) => {
                restore_consumed_pending(store, &mut batch, &account, b.source, sideband.source_epoch)?;
            }
            Block::Open(b) => {
                restore_consumed_pending(store, &mut batch, &account, b.source, sideband.source_epoch)?;
            }
            Block::State(b) if sideband.details.is_receive => {
                restore_consumed_pending(store, &mut batch, &account, b.link, sideband.source_epoch)?;
            }
            _ => {}
        }
    }

    if let Some(prev) = fork_point_previous {
        let mut restored_timestamp = sideband_timestamp(&chain[0].1);
        if let Some(prev_bytes) = BlockStore::get(store, &prev)? {
            let (mut prev_sideband, prev_block) = decode_stored(&prev_bytes)?;
            prev_sideband.successor = Hash::ZERO;
            restored_timestamp = prev_sideband.timestamp;
            batch.put_block(&prev, &encode_stored(&prev_sideband, &prev_block))?;
            if matches!(prev_block, Block::Send(_) | Block::Receive(_) | Block::Open(_) | Block::Change(_)) {
                batch.put_frontier(&prev, &account)?;
            }
        }
        let restored_info = AccountInfo {
            head: prev,
            representative: restored_representative,
            open_block: existing_account_info.as_ref().map(|i| i.open_block).unwrap_or(prev),
            balance: restored_balance,
            modified: Timestamp::new(restored_timestamp),
            block_count: chain[0].1.height.saturating_sub(1),
            epoch: restored_epoch,
        };
        batch.put_account(&account, &restored_info)?;
    } else {
        batch.delete_account(&account)?;
    }

    move_weight(
        batch.as_mut(),
        Some((tip_representative, tip_balance)),
        if fork_point_previous.is_some() { Some((restored_representative, restored_balance)) } else { None },
    )?;

    batch.commit()?;

    for (_, _, block) in chain.into_iter().rev() {
        undone.push(block);
    }
    Ok(undone)
}

fn sideband_timestamp(sideband: &Sideband) -> u64 {
    sideband.timestamp
}

/// Reconstruct the `PendingInfo` a `receive`/`open`/receive-shaped `state`
/// block consumed, and reinsert it. The amount is the balance delta the
/// source `send` created (its balance immediately before minus immediately
/// after), not the source block's own resulting balance.
fn restore_consumed_pending<S: Store>(
    store: &S,
    batch: &mut Box<dyn WriteBatch + '_>,
    account: &Account,
    source_hash: Hash,
    source_epoch: u8,
) -> Result<(), NodeError> {
    let source_bytes = BlockStore::get(store, &source_hash)?
        .ok_or_else(|| NodeError::Other("missing source block during rollback".into()))?;
    let (source_sideband, source_block) = decode_stored(&source_bytes)?;
    let sender = source_sideband.account;
    let new_balance = source_sideband.balance.unwrap_or_else(|| match &source_block {
        Block::State(b) => b.balance,
        _ => Amount::ZERO,
    });
    let prev_balance = match source_block.previous() {
        Some(prev_hash) => {
            let prev_bytes = BlockStore::get(store, &prev_hash)?
                .ok_or_else(|| NodeError::Other("missing source predecessor during rollback".into()))?;
            let (prev_sideband, prev_block) = decode_stored(&prev_bytes)?;
            prev_sideband.balance.unwrap_or_else(|| match &prev_block {
                Block::State(b) => b.balance,
                _ => Amount::ZERO,
            })
        }
        None => Amount::ZERO,
    };
    let amount = prev_balance.checked_sub(new_balance).unwrap_or(Amount::ZERO);
    batch.put_pending(
        &PendingKey { account: *account, hash: source_hash },
        &PendingInfo { source: sender, amount, epoch: source_epoch },
    )?;
    Ok(())
}

/// The in-process queue feeding the single block-processor worker: two
/// FIFOs (`blocks`, `forced`), observer callbacks, and the capacity
/// predicates the scheduler polls. Grounded on the teacher's
/// `ProcessingQueue` (`local_queue`/`network_queue` behind one capacity),
/// generalised from its local-over-network dequeue order to §4.5's
/// one-for-one forced/normal alternation.
pub struct BlockProcessor {
    inner: Mutex<QueueState>,
    full_size: usize,
    on_block_processed: Mutex<Vec<Box<dyn Fn(ProcessingStatus, &BlockContext) + Send + Sync>>>,
    on_batch_processed: Mutex<Vec<Box<dyn Fn(&[(ProcessingStatus, BlockContext)]) + Send + Sync>>>,
    on_rolled_back: Mutex<Vec<Box<dyn Fn(&Block) + Send + Sync>>>,
}

#[derive(Default)]
struct QueueState {
    blocks: VecDeque<BlockContext>,
    forced: VecDeque<BlockContext>,
    stopped: bool,
}

impl BlockProcessor {
    pub fn new(full_size: usize) -> Self {
        Self {
            inner: Mutex::new(QueueState::default()),
            full_size,
            on_block_processed: Mutex::new(Vec::new()),
            on_batch_processed: Mutex::new(Vec::new()),
            on_rolled_back: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, block: Block, source: BlockSource) {
        let mut state = self.inner.lock().unwrap();
        state.blocks.push_back(BlockContext::new(block, source));
    }

    pub fn force(&self, block: Block) {
        let mut state = self.inner.lock().unwrap();
        state.forced.push_back(BlockContext::forced(block));
    }

    pub fn size(&self) -> usize {
        let state = self.inner.lock().unwrap();
        state.blocks.len() + state.forced.len()
    }

    pub fn full(&self) -> bool {
        self.size() >= self.full_size
    }

    pub fn half_full(&self) -> bool {
        self.size() >= self.full_size / 2
    }

    pub fn have_blocks_ready(&self) -> bool {
        self.size() > 0
    }

    pub fn stop(&self) {
        self.inner.lock().unwrap().stopped = true;
    }

    pub fn on_block_processed(&self, callback: Box<dyn Fn(ProcessingStatus, &BlockContext) + Send + Sync>) {
        self.on_block_processed.lock().unwrap().push(callback);
    }

    pub fn on_batch_processed(&self, callback: Box<dyn Fn(&[(ProcessingStatus, BlockContext)]) + Send + Sync>) {
        self.on_batch_processed.lock().unwrap().push(callback);
    }

    pub fn on_rolled_back(&self, callback: Box<dyn Fn(&Block) + Send + Sync>) {
        self.on_rolled_back.lock().unwrap().push(callback);
    }

    /// Pop the next context to process, alternating forced and normal
    /// one-for-one so neither stream starves the other.
    fn dequeue_one(state: &mut QueueState, prefer_forced: bool) -> Option<BlockContext> {
        if prefer_forced {
            state.forced.pop_front().or_else(|| state.blocks.pop_front())
        } else {
            state.blocks.pop_front().or_else(|| state.forced.pop_front())
        }
    }

    /// Drain and process up to `batch_size` entries (or until the queue is
    /// empty), alternating forced/normal preference each draw. Returns the
    /// `(status, context)` pairs in processing order, for the caller to feed
    /// to `batch_processed` observers and enqueue any drained unchecked or
    /// rolled-back blocks.
    pub fn process_batch<S: Store>(
        &self,
        store: &S,
        thresholds: &WorkThresholds,
        epochs: &EpochSet,
        now: u64,
        batch_size: usize,
    ) -> Result<Vec<(ProcessingStatus, BlockContext)>, NodeError> {
        let mut results = Vec::new();
        let mut prefer_forced = false;
        for _ in 0..batch_size {
            let ctx = {
                let mut state = self.inner.lock().unwrap();
                if state.stopped {
                    break;
                }
                match Self::dequeue_one(&mut state, prefer_forced) {
                    Some(ctx) => ctx,
                    None => break,
                }
            };
            prefer_forced = !prefer_forced;

            let outcome = process_one(store, thresholds, epochs, now, &ctx)?;
            for callback in self.on_block_processed.lock().unwrap().iter() {
                callback(outcome.status, &ctx);
            }
            for block in &outcome.rolled_back {
                for callback in self.on_rolled_back.lock().unwrap().iter() {
                    callback(block);
                }
            }
            if !outcome.unblocked.is_empty() {
                let mut state = self.inner.lock().unwrap();
                for block in outcome.unblocked {
                    state.blocks.push_back(BlockContext::new(block, BlockSource::UncheckedReplay));
                }
            }
            results.push((outcome.status, ctx));
        }

        if !results.is_empty() {
            for callback in self.on_batch_processed.lock().unwrap().iter() {
                callback(&results);
            }
        }
        Ok(results)
    }

    /// Enqueue `block` and process batches until its own status is known.
    /// Returns `None` if the processor was stopped before the block's turn
    /// came up.
    pub fn add_blocking<S: Store>(
        &self,
        store: &S,
        thresholds: &WorkThresholds,
        epochs: &EpochSet,
        now: u64,
        block: Block,
        source: BlockSource,
    ) -> Result<Option<ProcessingStatus>, NodeError> {
        let target = block.hash();
        self.add(block, source);
        loop {
            if self.inner.lock().unwrap().stopped {
                return Ok(None);
            }
            let results = self.process_batch(store, thresholds, epochs, now, 1)?;
            if let Some((status, ctx)) = results.into_iter().find(|(_, ctx)| ctx.block.hash() == target) {
                return Ok(Some(status));
            }
            if !self.have_blocks_ready() {
                return Ok(None);
            }
        }
    }
}

impl ProcessingStatus {
    /// Whether a gap status means the block was queued for retry rather
    /// than rejected outright — used by callers deciding whether to log at
    /// `warn` or `debug`.
    pub fn is_retryable_gap(&self) -> bool {
        self.is_gap()
    }
}
