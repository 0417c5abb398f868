//! PoW validation.

use blake2::digest::consts::U8;
use blake2::{Blake2b, Digest};
use calyx_types::{Root, WorkNonce};

type Blake2b8 = Blake2b<U8>;

/// `work_value(root, nonce) = u64_from_le(blake2b-8(nonce || root))`.
///
/// Blake2b's digest length is part of its initial parameter block, not a
/// truncation applied after the fact — an 8-byte-configured Blake2b is a
/// different function from a 256-bit Blake2b sliced to 8 bytes. `Blake2b<U8>`
/// configures the digest length directly, matching the formula.
pub fn work_value(root: &Root, nonce: WorkNonce) -> u64 {
    let mut input = [0u8; 40];
    input[0..8].copy_from_slice(&nonce.to_le_bytes());
    input[8..40].copy_from_slice(root.as_bytes());

    let mut hasher = Blake2b8::new();
    hasher.update(&input);
    let hash = hasher.finalize();
    u64::from_le_bytes([
        hash[0], hash[1], hash[2], hash[3], hash[4], hash[5], hash[6], hash[7],
    ])
}

/// A nonce passes a threshold `T` iff `work_value(root, nonce) >= T`.
pub fn validate_work(root: &Root, nonce: WorkNonce, min_difficulty: u64) -> bool {
    work_value(root, nonce) >= min_difficulty
}
