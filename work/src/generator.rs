//! PoW generation (CPU, brute force).

use crate::{work_value, WorkError};
use calyx_types::{Root, WorkNonce};

/// Generates proof-of-work for a block or account root.
pub struct WorkGenerator;

impl WorkGenerator {
    /// Generate a work nonce that meets the minimum difficulty.
    ///
    /// Iterates nonces until `work_value` meets the threshold. Delegates to
    /// the same function `validate_work` checks against, so a nonce this
    /// produces is guaranteed to validate.
    pub fn generate(&self, root: &Root, min_difficulty: u64) -> Result<WorkNonce, WorkError> {
        for nonce in 0u64.. {
            let nonce = WorkNonce(nonce);
            if work_value(root, nonce) >= min_difficulty {
                return Ok(nonce);
            }
        }
        Err(WorkError::Cancelled)
    }
}
