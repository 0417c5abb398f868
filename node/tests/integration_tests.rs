//! Integration tests exercising the full ledger → node → LMDB stack
//! together, as opposed to the unit tests in `block_processor.rs` that
//! drive `process_one` in isolation. These confirm the pieces actually
//! wire up: a genesis seeded through a write batch, blocks pushed through
//! `process_one`, and the result read back through every store trait and
//! through a fresh `LmdbStore::open` of the same data directory.

use calyx_crypto::{generate_keypair, sign, verify};
use calyx_ledger::epoch::EpochSet;
use calyx_ledger::genesis::{create_genesis_block, GenesisConfig, NetworkId};
use calyx_ledger::sideband::{encode_stored, BlockDetails, Sideband};
use calyx_ledger::{Block, OpenBlock, SendBlock};
use calyx_node::{
    process_one, BlockContext, BlockSource, ProcessingStatus, SignatureCheck, SignatureCheckSet,
    SignatureChecker,
};
use calyx_store::{AccountStore, FrontierStore, PendingKey, PendingStore, RepWeightStore, WriteBatch};
use calyx_store_lmdb::LmdbStore;
use calyx_types::{Account, Amount, Hash, KeyPair, Signature, Timestamp, WorkNonce};
use calyx_work::thresholds::WorkThresholds;
use tempfile::tempdir;

fn low_thresholds() -> WorkThresholds {
    WorkThresholds::with_base(0)
}

/// Seeds genesis state directly through a write batch, matching how
/// `block_processor.rs`'s own test module bootstraps a ledger's first
/// entry — a genesis account's opening balance has no pending entry to
/// satisfy the ordinary receive path.
fn seed_genesis(store: &LmdbStore) -> (Block, KeyPair, Amount) {
    let genesis_key = generate_keypair();
    let initial_supply = Amount::new(1_000_000);
    let config = GenesisConfig { network: NetworkId::Dev, creator: genesis_key.public, initial_supply };
    let mut genesis = create_genesis_block(&config);
    let sig = sign(genesis.hash().as_bytes(), &genesis_key.private);
    if let Block::Open(ref mut b) = genesis {
        b.signature = sig;
    }

    let sideband = Sideband {
        height: 1,
        timestamp: 1_000,
        successor: Hash::ZERO,
        account: genesis_key.public,
        balance: Some(initial_supply),
        details: BlockDetails { epoch: 0, is_send: false, is_receive: false, is_epoch: false },
        source_epoch: 0,
    };
    let info = calyx_store::AccountInfo {
        head: genesis.hash(),
        representative: genesis_key.public,
        open_block: genesis.hash(),
        balance: initial_supply,
        modified: Timestamp::new(1_000),
        block_count: 1,
        epoch: 0,
    };
    let mut batch = store.write_batch().unwrap();
    batch.put_block(&genesis.hash(), &encode_stored(&sideband, &genesis)).unwrap();
    batch.put_account(&genesis_key.public, &info).unwrap();
    batch.put_frontier(&genesis.hash(), &genesis_key.public).unwrap();
    batch.put_rep_weight_delta(&genesis_key.public, initial_supply.raw() as i128).unwrap();
    Box::new(batch).commit().unwrap();

    (genesis, genesis_key, initial_supply)
}

fn signed_send(previous: Hash, destination: Account, balance: Amount, key: &KeyPair) -> Block {
    let mut block = Block::Send(SendBlock { previous, destination, balance, signature: Signature::ZERO, work: WorkNonce(0) });
    let sig = sign(block.hash().as_bytes(), &key.private);
    if let Block::Send(ref mut b) = block {
        b.signature = sig;
    }
    block
}

fn signed_open(source: Hash, representative: Account, key: &KeyPair) -> Block {
    let mut block = Block::Open(OpenBlock { source, representative, account: key.public, signature: Signature::ZERO, work: WorkNonce(0) });
    let sig = sign(block.hash().as_bytes(), &key.private);
    if let Block::Open(ref mut b) = block {
        b.signature = sig;
    }
    block
}

#[test]
fn genesis_send_open_pipeline_updates_frontier_and_pending() {
    let dir = tempdir().unwrap();
    let store = LmdbStore::open(dir.path(), 12, 10 * 1024 * 1024).unwrap();
    let thresholds = low_thresholds();
    let epochs = EpochSet::new();
    let (genesis, genesis_key, initial_supply) = seed_genesis(&store);

    let receiver = generate_keypair();
    let send = signed_send(genesis.hash(), receiver.public, Amount::new(999_000), &genesis_key);
    let outcome = process_one(&store, &thresholds, &epochs, 2_000, &BlockContext::new(send.clone(), BlockSource::Live)).unwrap();
    assert_eq!(outcome.status, ProcessingStatus::Progress);

    // The sender's old head is no longer a frontier; the send itself now is.
    assert!(FrontierStore::get(&store, &genesis.hash()).unwrap().is_none());
    assert_eq!(FrontierStore::get(&store, &send.hash()).unwrap(), Some(genesis_key.public));

    let pending = PendingStore::get(&store, &PendingKey { account: receiver.public, hash: send.hash() }).unwrap().unwrap();
    assert_eq!(pending.amount, initial_supply.checked_sub(Amount::new(999_000)).unwrap());
    assert_eq!(pending.source, genesis_key.public);

    let open = signed_open(send.hash(), receiver.public, &receiver);
    let outcome = process_one(&store, &thresholds, &epochs, 3_000, &BlockContext::new(open.clone(), BlockSource::Live)).unwrap();
    assert_eq!(outcome.status, ProcessingStatus::Progress);

    // Receiving consumes the pending entry and advances the frontier again.
    assert!(PendingStore::get(&store, &PendingKey { account: receiver.public, hash: send.hash() }).unwrap().is_none());
    assert_eq!(FrontierStore::get(&store, &open.hash()).unwrap(), Some(receiver.public));

    let receiver_info = AccountStore::get(&store, &receiver.public).unwrap().unwrap();
    assert_eq!(receiver_info.balance, Amount::new(1_000));
    assert_eq!(receiver_info.head, open.hash());
}

#[test]
fn ledger_state_survives_reopening_the_environment() {
    let dir = tempdir().unwrap();
    let path = dir.path().to_path_buf();

    let genesis_key = {
        let store = LmdbStore::open(&path, 12, 10 * 1024 * 1024).unwrap();
        let thresholds = low_thresholds();
        let epochs = EpochSet::new();
        let (genesis, genesis_key, _) = seed_genesis(&store);
        let send = signed_send(genesis.hash(), Account::new([9; 32]), Amount::new(500_000), &genesis_key);
        let outcome = process_one(&store, &thresholds, &epochs, 2_000, &BlockContext::new(send, BlockSource::Live)).unwrap();
        assert_eq!(outcome.status, ProcessingStatus::Progress);
        genesis_key
    };
    // `store` and its underlying `heed::Env` are dropped here.

    let reopened = LmdbStore::open(&path, 12, 10 * 1024 * 1024).unwrap();
    let info = AccountStore::get(&reopened, &genesis_key.public).unwrap().unwrap();
    assert_eq!(info.balance, Amount::new(500_000));
    assert_eq!(RepWeightStore::weight(&reopened, &genesis_key.public).unwrap(), Amount::new(500_000));
}

#[test]
fn gap_previous_block_is_unblocked_once_its_dependency_arrives() {
    let dir = tempdir().unwrap();
    let store = LmdbStore::open(dir.path(), 12, 10 * 1024 * 1024).unwrap();
    let thresholds = low_thresholds();
    let epochs = EpochSet::new();
    let (genesis, genesis_key, _) = seed_genesis(&store);

    let middle = signed_send(genesis.hash(), Account::new([1; 32]), Amount::new(900_000), &genesis_key);
    let trailing = signed_send(middle.hash(), Account::new([2; 32]), Amount::new(800_000), &genesis_key);

    // `trailing` arrives before `middle`: its previous doesn't exist yet.
    let gapped = process_one(&store, &thresholds, &epochs, 2_000, &BlockContext::new(trailing.clone(), BlockSource::Live)).unwrap();
    assert_eq!(gapped.status, ProcessingStatus::GapPrevious);
    assert!(gapped.unblocked.is_empty());

    let outcome = process_one(&store, &thresholds, &epochs, 2_100, &BlockContext::new(middle.clone(), BlockSource::Live)).unwrap();
    assert_eq!(outcome.status, ProcessingStatus::Progress);
    assert_eq!(outcome.unblocked.len(), 1);
    assert_eq!(outcome.unblocked[0].hash(), trailing.hash());
}

#[test]
fn duplicate_block_resubmission_is_old_and_rep_weight_is_unchanged() {
    let dir = tempdir().unwrap();
    let store = LmdbStore::open(dir.path(), 12, 10 * 1024 * 1024).unwrap();
    let thresholds = low_thresholds();
    let epochs = EpochSet::new();
    let (genesis, genesis_key, supply) = seed_genesis(&store);

    let ctx = BlockContext::new(genesis.clone(), BlockSource::Live);
    let outcome = process_one(&store, &thresholds, &epochs, 2_000, &ctx).unwrap();
    assert_eq!(outcome.status, ProcessingStatus::Old);
    assert_eq!(RepWeightStore::weight(&store, &genesis_key.public).unwrap(), supply);
}

#[test]
fn rep_weight_moves_from_sender_to_receivers_representative() {
    let dir = tempdir().unwrap();
    let store = LmdbStore::open(dir.path(), 12, 10 * 1024 * 1024).unwrap();
    let thresholds = low_thresholds();
    let epochs = EpochSet::new();
    let (genesis, genesis_key, supply) = seed_genesis(&store);

    let receiver = generate_keypair();
    let third_party_rep = Account::new([0x77; 32]);
    let send = signed_send(genesis.hash(), receiver.public, Amount::new(400_000), &genesis_key);
    process_one(&store, &thresholds, &epochs, 2_000, &BlockContext::new(send.clone(), BlockSource::Live)).unwrap();
    let open = signed_open(send.hash(), third_party_rep, &receiver);
    process_one(&store, &thresholds, &epochs, 2_100, &BlockContext::new(open, BlockSource::Live)).unwrap();

    let sender_weight = RepWeightStore::weight(&store, &genesis_key.public).unwrap();
    let receiver_rep_weight = RepWeightStore::weight(&store, &third_party_rep).unwrap();
    assert_eq!(sender_weight, Amount::new(600_000));
    assert_eq!(receiver_rep_weight, Amount::new(400_000));
    assert_eq!(sender_weight.raw() + receiver_rep_weight.raw(), supply.raw());
}

#[test]
fn signature_checker_batch_verifies_real_ledger_blocks() {
    let dir = tempdir().unwrap();
    let store = LmdbStore::open(dir.path(), 12, 10 * 1024 * 1024).unwrap();
    let thresholds = low_thresholds();
    let epochs = EpochSet::new();
    let (genesis, genesis_key, _) = seed_genesis(&store);

    let mut sends = Vec::new();
    let mut previous = genesis.hash();
    for i in 0u8..10 {
        let send = signed_send(previous, Account::new([i; 32]), Amount::new((1_000 - i as u64).into()), &genesis_key);
        let outcome = process_one(&store, &thresholds, &epochs, 2_000 + i as u64, &BlockContext::new(send.clone(), BlockSource::Live)).unwrap();
        assert_eq!(outcome.status, ProcessingStatus::Progress);
        previous = send.hash();
        sends.push(send);
    }

    let hashes: Vec<Hash> = sends.iter().map(|b| b.hash()).collect();
    let checks: Vec<SignatureCheck> = sends
        .iter()
        .zip(hashes.iter())
        .map(|(block, hash)| SignatureCheck { message: hash.as_bytes(), public_key: genesis_key.public, signature: *block.signature() })
        .collect();
    let set = SignatureCheckSet::new(checks);
    let checker = SignatureChecker::new(2);
    let results = checker.verify(&set);
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|r| *r));

    // A signature swapped between two otherwise-valid blocks fails both.
    let tampered = SignatureCheckSet::new(vec![
        SignatureCheck { message: hashes[0].as_bytes(), public_key: genesis_key.public, signature: *sends[1].signature() },
        SignatureCheck { message: hashes[1].as_bytes(), public_key: genesis_key.public, signature: *sends[0].signature() },
    ]);
    let tampered_results = checker.verify(&tampered);
    assert_eq!(tampered_results, vec![false, false]);

    // `calyx_crypto::verify` agrees block by block.
    for block in &sends {
        assert!(verify(block.hash().as_bytes(), block.signature(), &genesis_key.public));
    }
}
