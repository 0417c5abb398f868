//! Per-block derived data persisted alongside the block body (§3, §6).
//!
//! A block only becomes a ledger member once its sideband is computed and
//! attached — "a block without sideband is in-flight only." The on-disk
//! value in the `blocks` table is this module's encoding, not the bare
//! network wire bytes: `calyx_store_lmdb::block` depends on a fixed
//! 72-byte `account || successor || height` prefix to answer `successor`/
//! `account` lookups without decoding the rest, so that prefix comes
//! first here regardless of block variant, with the remaining sideband
//! fields and then the §6 block wire bytes following it.

use calyx_types::{Account, Amount, Hash};

use crate::block::Block;
use crate::error::LedgerError;

const FLAG_SEND: u8 = 1 << 0;
const FLAG_RECEIVE: u8 = 1 << 1;
const FLAG_EPOCH: u8 = 1 << 2;

/// Classification of a block's effect on its account, computed from its
/// balance delta and link semantics (§4.5 step 4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockDetails {
    pub epoch: u8,
    pub is_send: bool,
    pub is_receive: bool,
    pub is_epoch: bool,
}

impl BlockDetails {
    fn flags(&self) -> u8 {
        let mut f = 0;
        if self.is_send {
            f |= FLAG_SEND;
        }
        if self.is_receive {
            f |= FLAG_RECEIVE;
        }
        if self.is_epoch {
            f |= FLAG_EPOCH;
        }
        f
    }

    fn from_flags(epoch: u8, flags: u8) -> Self {
        Self {
            epoch,
            is_send: flags & FLAG_SEND != 0,
            is_receive: flags & FLAG_RECEIVE != 0,
            is_epoch: flags & FLAG_EPOCH != 0,
        }
    }
}

/// Per-block derived data: chain position, successor, and classification.
/// Populated by the ledger at insert time, never by the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sideband {
    pub height: u64,
    pub timestamp: u64,
    pub successor: Hash,
    pub account: Account,
    /// Post-block balance, carried explicitly for legacy variants (whose
    /// wire format has no balance field outside `send`); `None` for
    /// `state` blocks, which already carry their own balance.
    pub balance: Option<Amount>,
    pub details: BlockDetails,
    /// Epoch of the source block for a receive, `0` for non-receives.
    pub source_epoch: u8,
}

/// Encode `(sideband, block)` as the value stored in the `blocks` table.
pub fn encode_stored(sideband: &Sideband, block: &Block) -> Vec<u8> {
    let mut buf = Vec::with_capacity(72 + 10 + 16 + 128);
    buf.extend_from_slice(sideband.account.as_bytes());
    buf.extend_from_slice(sideband.successor.as_bytes());
    buf.extend_from_slice(&sideband.height.to_be_bytes());
    buf.extend_from_slice(&sideband.timestamp.to_be_bytes());
    buf.push(sideband.details.epoch);
    buf.push(sideband.details.flags());
    buf.push(sideband.source_epoch);
    match sideband.balance {
        Some(balance) => {
            buf.push(1);
            buf.extend_from_slice(&balance.to_be_bytes());
        }
        None => buf.push(0),
    }
    buf.extend_from_slice(&block.to_wire_bytes());
    buf
}

/// Decode a value previously produced by [`encode_stored`] back into its
/// sideband and block.
pub fn decode_stored(bytes: &[u8]) -> Result<(Sideband, Block), LedgerError> {
    const HEADER_LEN: usize = 32 + 32 + 8 + 8 + 1 + 1 + 1 + 1;
    if bytes.len() < HEADER_LEN {
        return Err(LedgerError::WireFormat { reason: "stored block value too short for sideband header".into() });
    }

    let account = Account::new(bytes[0..32].try_into().unwrap());
    let successor = Hash::new(bytes[32..64].try_into().unwrap());
    let height = u64::from_be_bytes(bytes[64..72].try_into().unwrap());
    let timestamp = u64::from_be_bytes(bytes[72..80].try_into().unwrap());
    let epoch = bytes[80];
    let flags = bytes[81];
    let source_epoch = bytes[82];
    let has_balance = bytes[83];

    let (balance, rest_offset) = if has_balance == 1 {
        if bytes.len() < HEADER_LEN + 16 {
            return Err(LedgerError::WireFormat { reason: "stored block value too short for legacy balance".into() });
        }
        let balance = Amount::from_be_bytes(bytes[HEADER_LEN..HEADER_LEN + 16].try_into().unwrap());
        (Some(balance), HEADER_LEN + 16)
    } else {
        (None, HEADER_LEN)
    };

    let block = Block::from_wire_bytes(&bytes[rest_offset..])?;

    let sideband = Sideband {
        height,
        timestamp,
        successor,
        account,
        balance,
        details: BlockDetails::from_flags(epoch, flags),
        source_epoch,
    };

    Ok((sideband, block))
}
