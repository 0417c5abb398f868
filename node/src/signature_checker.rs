//! Batched Ed25519 signature verification (§4.3).
//!
//! Grounded on `signature_check_set`/`signature_checker`: a caller hands
//! over parallel arrays of messages, public keys, and signatures, and gets
//! back one bool per input in the same order. This core carries the
//! parallel-OS-thread version of that contract (§5's concurrency model rules
//! out a cooperative scheduler): a dedicated `rayon` pool sized to
//! `signature_checker_threads`, with the calling thread also contributing
//! work via `rayon::join`/`par_chunks` rather than blocking on the pool —
//! the same "caller participates" property the original affords through its
//! thread-pool `post`.

use calyx_crypto::verify;
use calyx_types::{Account, Signature};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Entries per verification batch dispatched to a single pool task.
pub const BATCH_SIZE: usize = 256;

/// One (message, public key, signature) triple awaiting verification.
pub struct SignatureCheck<'a> {
    pub message: &'a [u8],
    pub public_key: Account,
    pub signature: Signature,
}

/// A set of checks submitted together; results come back in the same order.
pub struct SignatureCheckSet<'a> {
    pub checks: Vec<SignatureCheck<'a>>,
}

impl<'a> SignatureCheckSet<'a> {
    pub fn new(checks: Vec<SignatureCheck<'a>>) -> Self {
        Self { checks }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// Multi-threaded signature checker. Holds its own `rayon` pool so the
/// verification worker count is independent of any other pool in the
/// process (and so tests can construct several with different sizes).
pub struct SignatureChecker {
    pool: ThreadPool,
    stopped: std::sync::atomic::AtomicBool,
}

impl SignatureChecker {
    pub fn new(num_threads: usize) -> Self {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads.max(1))
            .thread_name(|i| format!("sig-check-{i}"))
            .build()
            .expect("failed to build signature-checker thread pool");

        Self { pool, stopped: std::sync::atomic::AtomicBool::new(false) }
    }

    /// Batch size used internally to chunk a large set across workers.
    pub fn get_batch_size() -> usize {
        BATCH_SIZE
    }

    /// Verify every check in `set`, returning one bool per entry in order.
    /// Returns an all-`false` vector if [`stop`](Self::stop) was called —
    /// matching the "checker refuses new work once stopped" contract.
    pub fn verify(&self, set: &SignatureCheckSet<'_>) -> Vec<bool> {
        if self.stopped.load(std::sync::atomic::Ordering::Acquire) {
            return vec![false; set.len()];
        }

        self.pool.install(|| {
            set.checks
                .par_chunks(BATCH_SIZE)
                .flat_map(|chunk| {
                    chunk
                        .iter()
                        .map(|c| verify(c.message, &c.signature, &c.public_key))
                        .collect::<Vec<_>>()
                })
                .collect()
        })
    }

    /// Block until any work already submitted to the pool has drained.
    /// Since `verify` is synchronous from the caller's perspective there is
    /// no in-flight queue to wait on here; `flush` exists to match the
    /// interface and to give future asynchronous submission a hook.
    pub fn flush(&self) {}

    /// Mark the checker stopped: subsequent `verify` calls return without
    /// doing any work.
    pub fn stop(&self) {
        self.stopped.store(true, std::sync::atomic::Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calyx_crypto::{generate_keypair, sign};

    #[test]
    fn verifies_all_valid_signatures() {
        let checker = SignatureChecker::new(2);
        let keypair = generate_keypair();
        let msg: &[u8] = b"hello";
        let sig = sign(msg, &keypair.private);

        let set = SignatureCheckSet::new(vec![
            SignatureCheck { message: msg, public_key: keypair.public, signature: sig },
            SignatureCheck { message: msg, public_key: keypair.public, signature: sig },
        ]);

        let results = checker.verify(&set);
        assert_eq!(results, vec![true, true]);
    }

    #[test]
    fn flags_bad_signature_within_batch() {
        let checker = SignatureChecker::new(2);
        let good = generate_keypair();
        let bad = generate_keypair();
        let msg: &[u8] = b"batch";
        let good_sig = sign(msg, &good.private);
        let bad_sig = sign(msg, &bad.private);

        let set = SignatureCheckSet::new(vec![
            SignatureCheck { message: msg, public_key: good.public, signature: good_sig },
            SignatureCheck { message: msg, public_key: good.public, signature: bad_sig },
        ]);

        let results = checker.verify(&set);
        assert_eq!(results, vec![true, false]);
    }

    #[test]
    fn verifies_batch_larger_than_batch_size() {
        let checker = SignatureChecker::new(4);
        let keypair = generate_keypair();
        let msg: &[u8] = b"large batch";
        let sig = sign(msg, &keypair.private);

        let checks: Vec<_> = (0..(BATCH_SIZE * 2 + 10))
            .map(|_| SignatureCheck { message: msg, public_key: keypair.public, signature: sig })
            .collect();
        let set = SignatureCheckSet::new(checks);

        let results = checker.verify(&set);
        assert_eq!(results.len(), BATCH_SIZE * 2 + 10);
        assert!(results.iter().all(|r| *r));
    }

    #[test]
    fn empty_set_returns_empty_results() {
        let checker = SignatureChecker::new(2);
        let set = SignatureCheckSet::new(vec![]);
        assert!(checker.verify(&set).is_empty());
    }

    #[test]
    fn stopped_checker_returns_all_false() {
        let checker = SignatureChecker::new(2);
        let keypair = generate_keypair();
        let msg: &[u8] = b"hi";
        let sig = sign(msg, &keypair.private);
        let set = SignatureCheckSet::new(vec![SignatureCheck {
            message: msg,
            public_key: keypair.public,
            signature: sig,
        }]);

        checker.stop();
        let results = checker.verify(&set);
        assert_eq!(results, vec![false]);
    }

    #[test]
    fn get_batch_size_matches_constant() {
        assert_eq!(SignatureChecker::get_batch_size(), BATCH_SIZE);
    }
}
