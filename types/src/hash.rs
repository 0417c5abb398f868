use std::fmt;

/// A 32-byte content hash — Blake2b-256 of block or vote-hash-list contents.
///
/// Also used as the `root` of a legacy block (its `previous` hash) or the
/// opening root of an account (the account's own bytes), per the `root`
/// column of the block-variant table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero() {
        assert!(Hash::ZERO.is_zero());
        assert!(!Hash::new([1u8; 32]).is_zero());
    }

    #[test]
    fn display_is_full_hex() {
        let h = Hash::new([0xab; 32]);
        assert_eq!(h.to_string().len(), 64);
    }
}
