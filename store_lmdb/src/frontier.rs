//! LMDB implementation of FrontierStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::frontier::FrontierStore;
use calyx_store::StoreError;
use calyx_types::{Account, Hash};

use crate::LmdbError;

pub struct LmdbFrontierStore {
    pub(crate) env: Arc<Env>,
    pub(crate) frontiers_db: Database<Bytes, Bytes>,
}

impl FrontierStore for LmdbFrontierStore {
    fn get(&self, hash: &Hash) -> Result<Option<Account>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.frontiers_db.get(&rtxn, hash.as_bytes()).map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| LmdbError::Serialization("bad frontier value".into()))?;
                Ok(Some(Account::new(arr)))
            }
            None => Ok(None),
        }
    }

    fn put(&self, hash: &Hash, account: &Account) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.frontiers_db.put(&mut wtxn, hash.as_bytes(), account.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, hash: &Hash) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.frontiers_db.delete(&mut wtxn, hash.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn begin(&self) -> Result<Vec<(Hash, Account)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for r in self.frontiers_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (k, v) = r.map_err(LmdbError::from)?;
            let hash_bytes: [u8; 32] = k.try_into().map_err(|_| LmdbError::Serialization("bad frontier key".into()))?;
            let acc_bytes: [u8; 32] = v.try_into().map_err(|_| LmdbError::Serialization("bad frontier value".into()))?;
            out.push((Hash::new(hash_bytes), Account::new(acc_bytes)));
        }
        Ok(out)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.frontiers_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
