use thiserror::Error;

/// Errors raised while decoding, validating, or applying ledger-level
/// operations. The block processor's richer 13-status rejection taxonomy
/// (`calyx_node::ProcessingStatus`) is built on top of these — most
/// processor statuses correspond to a caught `LedgerError` variant rather
/// than a new error kind.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("block gap: previous block {previous} not found")]
    BlockGap { previous: String },

    #[error("fork detected: account {account} already has a block at height {height}")]
    Fork { account: String, height: u64 },

    #[error("invalid block: {reason}")]
    InvalidBlock { reason: String },

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("malformed wire bytes: {reason}")]
    WireFormat { reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] calyx_store::StoreError),
}
