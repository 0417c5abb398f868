use std::fmt;

/// A 32-byte Ed25519 public key, used directly as the account identifier.
///
/// No string address format is specified for this core; accounts are
/// addressed by their raw public-key bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Account(pub [u8; 32]);

impl Account {
    pub const ZERO: Account = Account([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Account(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// An Ed25519 public key. Structurally identical to [`Account`] — every
/// account is addressed by its own public key — kept as a distinct alias so
/// call sites can say which role the bytes play.
pub type PublicKey = Account;

/// An Ed25519 private key (32-byte seed).
///
/// Intentionally does not implement `Debug` or `Serialize` to prevent
/// accidental exposure of key material in logs or persisted state.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey(pub [u8; 32]);

impl PrivateKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        PrivateKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// An Ed25519 keypair.
#[derive(Clone, Copy)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}
