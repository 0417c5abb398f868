//! LMDB implementation of PrunedStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::pruned::PrunedStore;
use calyx_store::StoreError;
use calyx_types::Hash;

use crate::LmdbError;

pub struct LmdbPrunedStore {
    pub(crate) env: Arc<Env>,
    pub(crate) pruned_db: Database<Bytes, Bytes>,
}

impl PrunedStore for LmdbPrunedStore {
    fn put(&self, hash: &Hash) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.pruned_db.put(&mut wtxn, hash.as_bytes(), &[]).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, hash: &Hash) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.pruned_db.delete(&mut wtxn, hash.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, hash: &Hash) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.pruned_db.get(&rtxn, hash.as_bytes()).map_err(LmdbError::from)?.is_some())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.pruned_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
