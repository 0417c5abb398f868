//! Property-based coverage of the §6 wire codecs — `Block`, `Vote`, and the
//! sideband on-disk encoding. Each type already carries exact-case unit
//! tests next to its definition (`ledger/src/block.rs`, `ledger/src/vote.rs`,
//! `ledger/src/sideband.rs`); these tests instead throw thousands of
//! randomized inputs at the same boundary and additionally assert that
//! malformed bytes are rejected cleanly rather than panicking.

use proptest::prelude::*;

use calyx_ledger::sideband::{decode_stored, encode_stored, BlockDetails, Sideband};
use calyx_ledger::vote::Vote;
use calyx_ledger::{Block, ChangeBlock, OpenBlock, ReceiveBlock, SendBlock, StateBlock};
use calyx_types::{Account, Amount, Hash, Signature, WorkNonce};

fn arb_hash() -> impl Strategy<Value = Hash> {
    any::<[u8; 32]>().prop_map(Hash::new)
}

fn arb_account() -> impl Strategy<Value = Account> {
    any::<[u8; 32]>().prop_map(Account::new)
}

fn arb_signature() -> impl Strategy<Value = Signature> {
    any::<[u8; 64]>().prop_map(Signature)
}

fn arb_amount() -> impl Strategy<Value = Amount> {
    any::<u128>().prop_map(Amount::new)
}

fn arb_work() -> impl Strategy<Value = WorkNonce> {
    any::<u64>().prop_map(WorkNonce)
}

fn arb_send_block() -> impl Strategy<Value = Block> {
    (arb_hash(), arb_account(), arb_amount(), arb_signature(), arb_work())
        .prop_map(|(previous, destination, balance, signature, work)| {
            Block::Send(SendBlock { previous, destination, balance, signature, work })
        })
}

fn arb_receive_block() -> impl Strategy<Value = Block> {
    (arb_hash(), arb_hash(), arb_signature(), arb_work())
        .prop_map(|(previous, source, signature, work)| Block::Receive(ReceiveBlock { previous, source, signature, work }))
}

fn arb_open_block() -> impl Strategy<Value = Block> {
    (arb_hash(), arb_account(), arb_account(), arb_signature(), arb_work())
        .prop_map(|(source, representative, account, signature, work)| {
            Block::Open(OpenBlock { source, representative, account, signature, work })
        })
}

fn arb_change_block() -> impl Strategy<Value = Block> {
    (arb_hash(), arb_account(), arb_signature(), arb_work())
        .prop_map(|(previous, representative, signature, work)| Block::Change(ChangeBlock { previous, representative, signature, work }))
}

fn arb_state_block() -> impl Strategy<Value = Block> {
    (arb_account(), arb_hash(), arb_account(), arb_hash(), arb_amount(), arb_signature(), arb_work()).prop_map(
        |(account, previous, representative, link, balance, signature, work)| {
            Block::State(StateBlock { account, previous, representative, link, balance, signature, work })
        },
    )
}

fn arb_block() -> impl Strategy<Value = Block> {
    prop_oneof![arb_send_block(), arb_receive_block(), arb_open_block(), arb_change_block(), arb_state_block()]
}

fn arb_vote() -> impl Strategy<Value = Vote> {
    (arb_account(), arb_signature(), any::<u64>(), proptest::collection::vec(arb_hash(), 1..30))
        .prop_map(|(account, signature, timestamp_raw, hashes)| Vote { account, signature, timestamp_raw, hashes })
}

fn arb_block_details() -> impl Strategy<Value = BlockDetails> {
    (any::<u8>(), any::<bool>(), any::<bool>(), any::<bool>())
        .prop_map(|(epoch, is_send, is_receive, is_epoch)| BlockDetails { epoch, is_send, is_receive, is_epoch })
}

fn arb_sideband() -> impl Strategy<Value = Sideband> {
    (arb_account(), any::<u64>(), any::<u64>(), arb_hash(), proptest::option::of(arb_amount()), arb_block_details(), any::<u8>())
        .prop_map(|(account, height, timestamp, successor, balance, details, source_epoch)| Sideband {
            height,
            timestamp,
            successor,
            account,
            balance,
            details,
            source_epoch,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn fuzz_block_wire_round_trip(block in arb_block()) {
        let bytes = block.to_wire_bytes();
        let decoded = Block::from_wire_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded.clone(), block.clone());
        prop_assert_eq!(decoded.hash(), block.hash());
        prop_assert_eq!(bytes, decoded.to_wire_bytes());
    }

    #[test]
    fn fuzz_vote_wire_round_trip(vote in arb_vote()) {
        let bytes = vote.to_wire_bytes();
        let decoded = Vote::from_wire_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded, vote);
    }

    #[test]
    fn fuzz_sideband_round_trip(sideband in arb_sideband(), block in arb_block()) {
        let bytes = encode_stored(&sideband, &block);
        let (decoded_sideband, decoded_block) = decode_stored(&bytes).unwrap();
        prop_assert_eq!(decoded_block, block);
        prop_assert_eq!(decoded_sideband, sideband);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn fuzz_block_from_wire_bytes_never_panics(data in proptest::collection::vec(any::<u8>(), 0..300)) {
        let _ = Block::from_wire_bytes(&data);
    }

    #[test]
    fn fuzz_vote_from_wire_bytes_never_panics(data in proptest::collection::vec(any::<u8>(), 0..2000)) {
        let _ = Vote::from_wire_bytes(&data);
    }

    #[test]
    fn fuzz_decode_stored_never_panics(data in proptest::collection::vec(any::<u8>(), 0..400)) {
        let _ = decode_stored(&data);
    }

    #[test]
    fn fuzz_block_rejects_unknown_type_tag(tag in 7u8..=255, rest in proptest::collection::vec(any::<u8>(), 0..200)) {
        let mut bytes = vec![tag];
        bytes.extend(rest);
        prop_assert!(Block::from_wire_bytes(&bytes).is_err());
    }

    #[test]
    fn fuzz_vote_rejects_misaligned_hash_list(
        account in arb_account(),
        signature in arb_signature(),
        timestamp_raw in any::<u64>(),
        extra in 1usize..32,
    ) {
        // A header plus a short, non-multiple-of-32 tail can never decode.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(account.as_bytes());
        bytes.extend_from_slice(signature.as_bytes());
        bytes.extend_from_slice(&timestamp_raw.to_le_bytes());
        bytes.extend(std::iter::repeat(0u8).take(extra));
        prop_assert!(Vote::from_wire_bytes(&bytes).is_err());
    }
}
