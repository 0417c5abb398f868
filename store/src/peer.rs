//! Persistent peer cache table.
//!
//! Stores recently seen peers so the node can reconnect on restart without
//! relying solely on bootstrap peers.

use crate::StoreError;

/// Trait for the `peers` table: endpoint → `()`.
///
/// Keys are peer endpoints (`"ip:port"`); the table records membership
/// only, mirroring the §4.4 schema — last-seen bookkeeping lives with the
/// caller, not in this table.
pub trait PeerStore {
    fn put(&self, endpoint: &str) -> Result<(), StoreError>;
    fn del(&self, endpoint: &str) -> Result<(), StoreError>;
    fn exists(&self, endpoint: &str) -> Result<bool, StoreError>;
    fn count(&self) -> Result<u64, StoreError>;
    fn begin(&self) -> Result<Vec<String>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}
