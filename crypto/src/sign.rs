//! Ed25519 message signing and verification.

use calyx_types::{Account, PrivateKey, Signature};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

/// Sign a message with a private key, returning the signature.
pub fn sign(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(private_key.as_bytes());
    let sig = signing_key.sign(message);
    Signature(sig.to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `false` (never panics or errors) on a malformed public key or
/// signature, matching the spec's "verification never throws" contract.
pub fn verify(message: &[u8], signature: &Signature, public_key: &Account) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    verifying_key.verify(message, &sig).is_ok()
}

/// Verify a batch of (message, public key, signature) triples.
///
/// Verification order is arbitrary and each result is independent of the
/// others; the caller-visible contract is simply "one bool per input
/// triple, same order". The signature-check service in `calyx-node` is
/// responsible for spreading this work across a worker pool — this
/// function is the single-threaded primitive it calls per sub-batch.
pub fn batch_verify(messages: &[&[u8]], public_keys: &[Account], signatures: &[Signature]) -> Vec<bool> {
    assert_eq!(messages.len(), public_keys.len());
    assert_eq!(messages.len(), signatures.len());

    messages
        .iter()
        .zip(public_keys.iter())
        .zip(signatures.iter())
        .map(|((msg, key), sig)| verify(msg, sig, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;

    #[test]
    fn sign_then_verify_succeeds() {
        let keypair = generate_keypair();
        let msg = b"hello calyx";
        let sig = sign(msg, &keypair.private);
        assert!(verify(msg, &sig, &keypair.public));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let keypair = generate_keypair();
        let sig = sign(b"original", &keypair.private);
        assert!(!verify(b"tampered", &sig, &keypair.public));
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let keypair_a = generate_keypair();
        let keypair_b = generate_keypair();
        let sig = sign(b"hello", &keypair_a.private);
        assert!(!verify(b"hello", &sig, &keypair_b.public));
    }

    #[test]
    fn batch_verify_mixed_results() {
        let good = generate_keypair();
        let bad = generate_keypair();
        let msg: &[u8] = b"batch message";
        let good_sig = sign(msg, &good.private);
        let bad_sig = sign(msg, &bad.private);

        let messages = [msg, msg];
        let keys = [good.public, good.public];
        let sigs = [good_sig, bad_sig];

        let results = batch_verify(&messages, &keys, &sigs);
        assert_eq!(results, vec![true, false]);
    }
}
