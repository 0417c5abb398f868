//! Fundamental value types for the Calyx node core.
//!
//! This crate defines the identifiers shared across every other crate in
//! the workspace: hashes, accounts/keys, amounts, signatures, and work
//! nonces. It carries no protocol logic — only the wire-shaped newtypes
//! and their serde/display impls.

pub mod account;
pub mod amount;
pub mod error;
pub mod hash;
pub mod signature;
pub mod time;
pub mod work;

pub use account::{Account, KeyPair, PrivateKey, PublicKey};
pub use amount::Amount;
pub use error::TypesError;
pub use hash::Hash;
pub use signature::Signature;
pub use time::{millis_since_epoch, Timestamp};
pub use work::WorkNonce;

/// Either an account's opening root (its own public key) or a previous
/// block's hash, per the block-variant `root` column.
pub type Root = Hash;
