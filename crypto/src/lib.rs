//! Cryptographic primitives for the Calyx node core.
//!
//! - **Ed25519** for single and batch signature verification.
//! - **Blake2b-256** for hashing blocks, votes, and work proofs.

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi, hash_bytes};
pub use keys::{generate_keypair, keypair_from_private, public_from_private};
pub use sign::{batch_verify, sign, verify};
