use thiserror::Error;

/// Errors raised while constructing or validating core value types.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
