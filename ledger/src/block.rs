//! The five block variants and their wire codec.
//!
//! A tagged union with exhaustive matching, per the design note in §9 of
//! the spec: legacy variants (`send`/`receive`/`open`/`change`) hash and
//! serialise their own fields; `state` blocks hash a single canonical
//! preimage regardless of what operation they represent.

use calyx_crypto::blake2b_256_multi;
use calyx_types::{Account, Amount, Hash, Signature, WorkNonce};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

const TYPE_SEND: u8 = 2;
const TYPE_RECEIVE: u8 = 3;
const TYPE_OPEN: u8 = 4;
const TYPE_CHANGE: u8 = 5;
const TYPE_STATE: u8 = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendBlock {
    pub previous: Hash,
    pub destination: Account,
    pub balance: Amount,
    pub signature: Signature,
    pub work: WorkNonce,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveBlock {
    pub previous: Hash,
    pub source: Hash,
    pub signature: Signature,
    pub work: WorkNonce,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenBlock {
    pub source: Hash,
    pub representative: Account,
    pub account: Account,
    pub signature: Signature,
    pub work: WorkNonce,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBlock {
    pub previous: Hash,
    pub representative: Account,
    pub signature: Signature,
    pub work: WorkNonce,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBlock {
    pub account: Account,
    pub previous: Hash,
    pub representative: Account,
    pub link: Hash,
    pub balance: Amount,
    pub signature: Signature,
    pub work: WorkNonce,
}

/// A block on some account's chain, in one of the five variants the core
/// understands. Immutable once constructed; all fields beyond `signature`
/// and `work` participate in `hash()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Send(SendBlock),
    Receive(ReceiveBlock),
    Open(OpenBlock),
    Change(ChangeBlock),
    State(StateBlock),
}

impl Block {
    /// The wire type tag, §6.
    pub fn type_tag(&self) -> u8 {
        match self {
            Block::Send(_) => TYPE_SEND,
            Block::Receive(_) => TYPE_RECEIVE,
            Block::Open(_) => TYPE_OPEN,
            Block::Change(_) => TYPE_CHANGE,
            Block::State(_) => TYPE_STATE,
        }
    }

    pub fn signature(&self) -> &Signature {
        match self {
            Block::Send(b) => &b.signature,
            Block::Receive(b) => &b.signature,
            Block::Open(b) => &b.signature,
            Block::Change(b) => &b.signature,
            Block::State(b) => &b.signature,
        }
    }

    pub fn work(&self) -> WorkNonce {
        match self {
            Block::Send(b) => b.work,
            Block::Receive(b) => b.work,
            Block::Open(b) => b.work,
            Block::Change(b) => b.work,
            Block::State(b) => b.work,
        }
    }

    /// The `previous` link for variants that have one; `None` for `open`
    /// (whose chain has no predecessor) and for a `state` block opening an
    /// account (`previous == Hash::ZERO`).
    pub fn previous(&self) -> Option<Hash> {
        match self {
            Block::Send(b) => Some(b.previous),
            Block::Receive(b) => Some(b.previous),
            Block::Open(_) => None,
            Block::Change(b) => Some(b.previous),
            Block::State(b) if b.previous.is_zero() => None,
            Block::State(b) => Some(b.previous),
        }
    }

    /// `root()` per the variant table in §3: `previous` if the block has
    /// one, else the account's own bytes (for `open` and an opening
    /// `state` block), which is the anchor proof-of-work and signatures
    /// are computed against for the first block on a chain.
    pub fn root(&self) -> Hash {
        match self {
            Block::Send(b) => b.previous,
            Block::Receive(b) => b.previous,
            Block::Open(b) => Hash::new(*b.account.as_bytes()),
            Block::Change(b) => b.previous,
            Block::State(b) if b.previous.is_zero() => Hash::new(*b.account.as_bytes()),
            Block::State(b) => b.previous,
        }
    }

    /// The account this block is signed for, where statically known.
    /// `send`/`receive`/`change` don't carry their account inline — the
    /// block processor resolves it from the chain the `previous` hash
    /// belongs to (via sideband or the in-flight context).
    pub fn account(&self) -> Option<Account> {
        match self {
            Block::Open(b) => Some(b.account),
            Block::State(b) => Some(b.account),
            _ => None,
        }
    }

    /// `true` for variants whose semantics can only be "this account
    /// pays someone else": `send` always; `state` when balance decreases.
    pub fn is_legacy_send(&self) -> bool {
        matches!(self, Block::Send(_))
    }

    /// Blake2b-256 over the variant-specific hash preimage, §4.2. Legacy
    /// variants hash their own field layout; `state` blocks hash a fixed
    /// six-field preamble regardless of what they represent, so the
    /// preimage can't be confused for another variant's hash with the
    /// same field values.
    pub fn hash(&self) -> Hash {
        let digest = match self {
            Block::Send(b) => blake2b_256_multi(&[
                b.previous.as_bytes(),
                b.destination.as_bytes(),
                &b.balance.to_be_bytes(),
            ]),
            Block::Receive(b) => {
                blake2b_256_multi(&[b.previous.as_bytes(), b.source.as_bytes()])
            }
            Block::Open(b) => blake2b_256_multi(&[
                b.source.as_bytes(),
                b.representative.as_bytes(),
                b.account.as_bytes(),
            ]),
            Block::Change(b) => {
                blake2b_256_multi(&[b.previous.as_bytes(), b.representative.as_bytes()])
            }
            Block::State(b) => blake2b_256_multi(&[
                STATE_BLOCK_PREAMBLE,
                b.account.as_bytes(),
                b.previous.as_bytes(),
                b.representative.as_bytes(),
                b.link.as_bytes(),
                &b.balance.to_be_bytes(),
            ]),
        };
        Hash::new(digest)
    }

    /// `hash()` folded with signature and work, used by the uniquer so two
    /// differently-signed copies of the same logical block are treated as
    /// distinct cache entries.
    pub fn full_hash(&self) -> Hash {
        let hash = self.hash();
        let digest = blake2b_256_multi(&[
            hash.as_bytes(),
            self.signature().as_bytes(),
            &self.work().to_le_bytes(),
        ]);
        Hash::new(digest)
    }

    /// Encode per the §6 wire format: `[type:u8][variant fields][signature:64][work:u64-LE]`.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        buf.push(self.type_tag());
        match self {
            Block::Send(b) => {
                buf.extend_from_slice(b.previous.as_bytes());
                buf.extend_from_slice(b.destination.as_bytes());
                buf.extend_from_slice(&b.balance.to_be_bytes());
            }
            Block::Receive(b) => {
                buf.extend_from_slice(b.previous.as_bytes());
                buf.extend_from_slice(b.source.as_bytes());
            }
            Block::Open(b) => {
                buf.extend_from_slice(b.source.as_bytes());
                buf.extend_from_slice(b.representative.as_bytes());
                buf.extend_from_slice(b.account.as_bytes());
            }
            Block::Change(b) => {
                buf.extend_from_slice(b.previous.as_bytes());
                buf.extend_from_slice(b.representative.as_bytes());
            }
            Block::State(b) => {
                buf.extend_from_slice(b.account.as_bytes());
                buf.extend_from_slice(b.previous.as_bytes());
                buf.extend_from_slice(b.representative.as_bytes());
                buf.extend_from_slice(b.link.as_bytes());
                buf.extend_from_slice(&b.balance.to_be_bytes());
            }
        }
        buf.extend_from_slice(self.signature().as_bytes());
        buf.extend_from_slice(&self.work().to_le_bytes());
        buf
    }

    /// Decode the §6 wire format. Rejects trailing or truncated input so a
    /// round-trip through `to_wire_bytes`/`from_wire_bytes` is exact.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.is_empty() {
            return Err(LedgerError::WireFormat { reason: "empty block".into() });
        }
        let tag = bytes[0];
        let body = &bytes[1..];

        let (fixed_len, read_fields): (usize, fn(&[u8], Signature, WorkNonce) -> Block) = match tag
        {
            TYPE_SEND => (32 + 32 + 16, |f, signature, work| {
                Block::Send(SendBlock {
                    previous: take_hash(f, 0),
                    destination: take_account(f, 32),
                    balance: take_amount(f, 64),
                    signature,
                    work,
                })
            }),
            TYPE_RECEIVE => (32 + 32, |f, signature, work| {
                Block::Receive(ReceiveBlock {
                    previous: take_hash(f, 0),
                    source: take_hash(f, 32),
                    signature,
                    work,
                })
            }),
            TYPE_OPEN => (32 + 32 + 32, |f, signature, work| {
                Block::Open(OpenBlock {
                    source: take_hash(f, 0),
                    representative: take_account(f, 32),
                    account: take_account(f, 64),
                    signature,
                    work,
                })
            }),
            TYPE_CHANGE => (32 + 32, |f, signature, work| {
                Block::Change(ChangeBlock {
                    previous: take_hash(f, 0),
                    representative: take_account(f, 32),
                    signature,
                    work,
                })
            }),
            TYPE_STATE => (32 + 32 + 32 + 32 + 16, |f, signature, work| {
                Block::State(StateBlock {
                    account: take_account(f, 0),
                    previous: take_hash(f, 32),
                    representative: take_account(f, 64),
                    link: take_hash(f, 96),
                    balance: take_amount(f, 128),
                    signature,
                    work,
                })
            }),
            other => return Err(LedgerError::WireFormat { reason: format!("unknown block type tag {other}") }),
        };

        let expected_len = fixed_len + 64 + 8;
        if body.len() != expected_len {
            return Err(LedgerError::WireFormat {
                reason: format!("expected {expected_len} body bytes for type {tag}, got {}", body.len()),
            });
        }

        let signature = {
            let arr: [u8; 64] = body[fixed_len..fixed_len + 64].try_into().unwrap();
            Signature(arr)
        };
        let work = {
            let arr: [u8; 8] = body[fixed_len + 64..fixed_len + 72].try_into().unwrap();
            WorkNonce(u64::from_le_bytes(arr))
        };

        Ok(read_fields(&body[..fixed_len], signature, work))
    }
}

const STATE_BLOCK_PREAMBLE: &[u8] = &[0u8; 32];

fn take_hash(buf: &[u8], offset: usize) -> Hash {
    let arr: [u8; 32] = buf[offset..offset + 32].try_into().unwrap();
    Hash::new(arr)
}

fn take_account(buf: &[u8], offset: usize) -> Account {
    let arr: [u8; 32] = buf[offset..offset + 32].try_into().unwrap();
    Account::new(arr)
}

fn take_amount(buf: &[u8], offset: usize) -> Amount {
    let arr: [u8; 16] = buf[offset..offset + 16].try_into().unwrap();
    Amount::from_be_bytes(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> Block {
        Block::State(StateBlock {
            account: Account::new([1u8; 32]),
            previous: Hash::new([2u8; 32]),
            representative: Account::new([3u8; 32]),
            link: Hash::new([4u8; 32]),
            balance: Amount::new(1_000),
            signature: Signature([5u8; 64]),
            work: WorkNonce(42),
        })
    }

    fn sample_send() -> Block {
        Block::Send(SendBlock {
            previous: Hash::new([9u8; 32]),
            destination: Account::new([8u8; 32]),
            balance: Amount::new(500),
            signature: Signature([7u8; 64]),
            work: WorkNonce(7),
        })
    }

    #[test]
    fn wire_round_trip_state() {
        let block = sample_state();
        let bytes = block.to_wire_bytes();
        let decoded = Block::from_wire_bytes(&bytes).unwrap();
        assert_eq!(block, decoded);
        assert_eq!(bytes, decoded.to_wire_bytes());
    }

    #[test]
    fn wire_round_trip_every_variant() {
        let open = Block::Open(OpenBlock {
            source: Hash::new([1u8; 32]),
            representative: Account::new([2u8; 32]),
            account: Account::new([3u8; 32]),
            signature: Signature([4u8; 64]),
            work: WorkNonce(1),
        });
        let receive = Block::Receive(ReceiveBlock {
            previous: Hash::new([1u8; 32]),
            source: Hash::new([2u8; 32]),
            signature: Signature([3u8; 64]),
            work: WorkNonce(2),
        });
        let change = Block::Change(ChangeBlock {
            previous: Hash::new([1u8; 32]),
            representative: Account::new([2u8; 32]),
            signature: Signature([3u8; 64]),
            work: WorkNonce(3),
        });
        for block in [sample_send(), receive, open, change, sample_state()] {
            let bytes = block.to_wire_bytes();
            assert_eq!(Block::from_wire_bytes(&bytes).unwrap(), block);
        }
    }

    #[test]
    fn hash_stable_across_round_trip() {
        let block = sample_state();
        let bytes = block.to_wire_bytes();
        let decoded = Block::from_wire_bytes(&bytes).unwrap();
        assert_eq!(block.hash(), decoded.hash());
    }

    #[test]
    fn hash_excludes_signature_and_work() {
        let mut block = sample_state();
        let hash1 = block.hash();
        if let Block::State(ref mut b) = block {
            b.signature = Signature([0xFFu8; 64]);
            b.work = WorkNonce(999_999);
        }
        assert_eq!(hash1, block.hash());
    }

    #[test]
    fn full_hash_changes_with_signature() {
        let mut block = sample_state();
        let full1 = block.full_hash();
        if let Block::State(ref mut b) = block {
            b.signature = Signature([0xFFu8; 64]);
        }
        assert_ne!(full1, block.full_hash());
    }

    #[test]
    fn root_is_previous_when_nonzero() {
        let block = sample_state();
        assert_eq!(block.root(), Hash::new([2u8; 32]));
    }

    #[test]
    fn root_is_account_when_opening() {
        let block = Block::State(StateBlock {
            account: Account::new([7u8; 32]),
            previous: Hash::ZERO,
            representative: Account::new([3u8; 32]),
            link: Hash::new([4u8; 32]),
            balance: Amount::new(1_000),
            signature: Signature([5u8; 64]),
            work: WorkNonce(42),
        });
        assert_eq!(block.root(), Hash::new([7u8; 32]));
    }

    #[test]
    fn decode_rejects_truncated_body() {
        let block = sample_state();
        let mut bytes = block.to_wire_bytes();
        bytes.pop();
        assert!(Block::from_wire_bytes(&bytes).is_err());
    }

    #[test]
    fn decode_rejects_unknown_type() {
        assert!(Block::from_wire_bytes(&[0xEE]).is_err());
    }
}
