//! Ed25519 key generation.

use calyx_types::{Account, KeyPair, PrivateKey};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

/// Generate a new Ed25519 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    let private = PrivateKey::new(signing_key.to_bytes());
    let public = Account::new(signing_key.verifying_key().to_bytes());
    KeyPair { public, private }
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Account {
    let signing_key = SigningKey::from_bytes(private.as_bytes());
    Account::new(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_consistent_pair() {
        let pair = generate_keypair();
        assert_eq!(public_from_private(&pair.private), pair.public);
    }

    #[test]
    fn keypair_from_private_matches_derivation() {
        let pair = generate_keypair();
        let rebuilt = keypair_from_private(pair.private);
        assert_eq!(rebuilt.public, pair.public);
    }

    #[test]
    fn distinct_generations_differ() {
        let a = generate_keypair();
        let b = generate_keypair();
        assert_ne!(a.public, b.public);
    }
}
