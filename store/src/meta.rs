//! Database metadata table.

use crate::StoreError;

/// Trait for the `meta` table: u32 → value.
///
/// A generic key-value table for internal bookkeeping (schema version and
/// the like) that doesn't belong in any domain-specific table.
pub trait MetaStore {
    fn put(&self, key: u32, value: &[u8]) -> Result<(), StoreError>;
    fn get(&self, key: u32) -> Result<Option<Vec<u8>>, StoreError>;
    fn del(&self, key: u32) -> Result<(), StoreError>;

    /// Convenience wrapper: fixed key `0` stores the schema version.
    fn schema_version(&self) -> Result<u32, StoreError> {
        Ok(self
            .get(0)?
            .map(|bytes| u32::from_le_bytes(bytes.try_into().unwrap_or([0; 4])))
            .unwrap_or(0))
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put(0, &version.to_le_bytes())
    }
}
