//! Votes — §3, §4.2, §6.
//!
//! A vote is a representative's signed endorsement of one or more block
//! hashes competing for the same chain position. The raw 64-bit timestamp
//! packs a millisecond clock reading into its upper 60 bits and a 4-bit
//! duration exponent into its lower 4; an all-ones value is the sentinel
//! for a *final* vote (one that can never be superseded at that root).

use calyx_crypto::{blake2b_256, verify as ed25519_verify};
use calyx_types::{Account, Hash, Signature};

use crate::error::LedgerError;

const MAX_HASHES: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vote {
    pub account: Account,
    pub signature: Signature,
    pub timestamp_raw: u64,
    pub hashes: Vec<Hash>,
}

impl Vote {
    /// `timestamp_raw == u64::MAX` marks a final vote — one cast for a
    /// confirmed root that can never be superseded.
    pub fn is_final(&self) -> bool {
        self.timestamp_raw == u64::MAX
    }

    /// Millisecond timestamp with the low 4 duration bits masked out.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_raw & !0xF
    }

    /// `1 << (4 + duration_bits)`, the window (in ms) this vote is valid
    /// for before a fresh one is required.
    pub fn duration_ms(&self) -> u64 {
        let duration_bits = self.timestamp_raw & 0xF;
        1u64 << (4 + duration_bits)
    }

    /// The signed message: `blake2b256(hashes...) || timestamp_raw` (LE).
    fn signing_message(&self) -> [u8; 40] {
        let hash_parts: Vec<&[u8]> = self.hashes.iter().map(|h| h.as_bytes().as_slice()).collect();
        let digest = calyx_crypto::blake2b_256_multi(&hash_parts);
        let mut message = [0u8; 40];
        message[0..32].copy_from_slice(&digest);
        message[32..40].copy_from_slice(&self.timestamp_raw.to_le_bytes());
        message
    }

    /// `ed25519_verify(account, blake2b(hashes) || timestamp_raw, signature)`.
    pub fn verify(&self) -> bool {
        let message = self.signing_message();
        ed25519_verify(&message, &self.signature, &self.account)
    }

    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32 + 64 + 8 + self.hashes.len() * 32);
        buf.extend_from_slice(self.account.as_bytes());
        buf.extend_from_slice(self.signature.as_bytes());
        buf.extend_from_slice(&self.timestamp_raw.to_le_bytes());
        for hash in &self.hashes {
            buf.extend_from_slice(hash.as_bytes());
        }
        buf
    }

    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        const HEADER_LEN: usize = 32 + 64 + 8;
        if bytes.len() < HEADER_LEN {
            return Err(LedgerError::WireFormat { reason: "vote shorter than fixed header".into() });
        }
        let remaining = bytes.len() - HEADER_LEN;
        if remaining == 0 || remaining % 32 != 0 {
            return Err(LedgerError::WireFormat { reason: "vote hash list is not a whole number of 32-byte hashes".into() });
        }
        let count = remaining / 32;
        if count > MAX_HASHES {
            return Err(LedgerError::WireFormat { reason: format!("vote carries {count} hashes, max is {MAX_HASHES}") });
        }

        let account = Account::new(bytes[0..32].try_into().unwrap());
        let signature = Signature(bytes[32..96].try_into().unwrap());
        let timestamp_raw = u64::from_le_bytes(bytes[96..104].try_into().unwrap());

        let mut hashes = Vec::with_capacity(count);
        for i in 0..count {
            let start = HEADER_LEN + i * 32;
            hashes.push(Hash::new(bytes[start..start + 32].try_into().unwrap()));
        }

        Ok(Vote { account, signature, timestamp_raw, hashes })
    }
}

/// `work_value`-style helper reused by the bit-packing formulas, exposed
/// for callers that need a raw hash of a hash list without constructing a
/// full `Vote` (e.g. tests, the signature checker's batching).
pub fn hash_list_digest(hashes: &[Hash]) -> [u8; 32] {
    let parts: Vec<&[u8]> = hashes.iter().map(|h| h.as_bytes().as_slice()).collect();
    blake2b_256(&parts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calyx_crypto::{keys::generate_keypair, sign};

    fn signed_vote(hashes: Vec<Hash>, timestamp_raw: u64) -> Vote {
        let keypair = generate_keypair();
        let mut vote = Vote { account: keypair.public, signature: Signature::ZERO, timestamp_raw, hashes };
        let message = vote.signing_message();
        vote.signature = sign(&message, &keypair.private);
        vote
    }

    #[test]
    fn verify_accepts_correctly_signed_vote() {
        let vote = signed_vote(vec![Hash::new([1u8; 32])], 1_700_000_000_0000);
        assert!(vote.verify());
    }

    #[test]
    fn verify_rejects_tampered_hash_list() {
        let mut vote = signed_vote(vec![Hash::new([1u8; 32])], 1_700_000_000_0000);
        vote.hashes[0] = Hash::new([2u8; 32]);
        assert!(!vote.verify());
    }

    #[test]
    fn max_u64_timestamp_is_final() {
        let vote = signed_vote(vec![Hash::new([1u8; 32])], u64::MAX);
        assert!(vote.is_final());
    }

    #[test]
    fn duration_and_timestamp_decode_from_raw() {
        let duration_bits: u64 = 3;
        let ms_component: u64 = 1_700_000_000_000 & !0xF;
        let raw = ms_component | duration_bits;
        let vote = signed_vote(vec![Hash::new([1u8; 32])], raw);
        assert_eq!(vote.timestamp_ms(), ms_component);
        assert_eq!(vote.duration_ms(), 1u64 << (4 + duration_bits));
    }

    #[test]
    fn wire_round_trip_multi_hash() {
        let vote = signed_vote(vec![Hash::new([1u8; 32]), Hash::new([2u8; 32]), Hash::new([3u8; 32])], 123);
        let bytes = vote.to_wire_bytes();
        let decoded = Vote::from_wire_bytes(&bytes).unwrap();
        assert_eq!(vote, decoded);
    }

    #[test]
    fn decode_rejects_empty_hash_list() {
        let vote = signed_vote(vec![Hash::new([1u8; 32])], 1);
        let mut bytes = vote.to_wire_bytes();
        bytes.truncate(32 + 64 + 8);
        assert!(Vote::from_wire_bytes(&bytes).is_err());
    }

    #[test]
    fn decode_rejects_more_than_255_hashes() {
        let too_many = vec![0u8; 32 + 64 + 8 + 256 * 32];
        assert!(Vote::from_wire_bytes(&too_many).is_err());
    }

    #[test]
    fn decode_rejects_misaligned_trailing_bytes() {
        let vote = signed_vote(vec![Hash::new([1u8; 32])], 1);
        let mut bytes = vote.to_wire_bytes();
        bytes.push(0xAB);
        assert!(Vote::from_wire_bytes(&bytes).is_err());
    }
}
