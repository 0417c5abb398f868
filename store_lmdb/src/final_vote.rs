//! LMDB implementation of FinalVoteStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::final_vote::FinalVoteStore;
use calyx_store::StoreError;
use calyx_types::{Hash, Root};

use crate::LmdbError;

pub struct LmdbFinalVoteStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Bytes, Bytes>,
}

impl FinalVoteStore for LmdbFinalVoteStore {
    fn get(&self, root: &Root) -> Result<Option<Hash>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.db.get(&rtxn, root.as_bytes()).map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| LmdbError::Serialization("bad final_vote value".into()))?;
                Ok(Some(Hash::new(arr)))
            }
            None => Ok(None),
        }
    }

    fn put(&self, root: &Root, hash: &Hash) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        // Any existing entry wins, whether or not it matches `hash` — this
        // table only ever records the first final vote cast for a root.
        if self.db.get(&wtxn, root.as_bytes()).map_err(LmdbError::from)?.is_some() {
            return Ok(false);
        }
        self.db.put(&mut wtxn, root.as_bytes(), hash.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }

    fn del(&self, root: &Root) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.delete(&mut wtxn, root.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
