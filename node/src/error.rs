use thiserror::Error;

/// Error taxonomy for the node core (§7): the four per-block categories
/// (validation rejection, missing dependency, transient pressure) are
/// carried as `ProcessingStatus` values, not `Err`s — this enum is only for
/// the fourth category, fatal invariant breaches and ambient failures that
/// abort a caller's request outright.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] calyx_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] calyx_store::StoreError),

    #[error("rollback recursion depth exceeded for account chain")]
    RollbackDepthExceeded,

    #[error("block processor stopped")]
    Stopped,

    #[error("config error: {0}")]
    Config(String),

    #[error("node not initialized")]
    NotInitialized,

    #[error("{0}")]
    Other(String),
}
