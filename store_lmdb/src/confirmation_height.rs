//! LMDB implementation of ConfirmationHeightStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::confirmation_height::{ConfirmationHeightInfo, ConfirmationHeightStore};
use calyx_store::StoreError;
use calyx_types::Account;

use crate::LmdbError;

pub struct LmdbConfirmationHeightStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Bytes, Bytes>,
}

impl ConfirmationHeightStore for LmdbConfirmationHeightStore {
    fn get(&self, account: &Account) -> Result<Option<ConfirmationHeightInfo>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.db.get(&rtxn, account.as_bytes()).map_err(LmdbError::from)?;
        val.map(|b| bincode::deserialize(b).map_err(LmdbError::from).map_err(Into::into)).transpose()
    }

    fn put(&self, account: &Account, info: &ConfirmationHeightInfo) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.put(&mut wtxn, account.as_bytes(), &bytes).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, account: &Account) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.delete(&mut wtxn, account.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, account: &Account) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.db.get(&rtxn, account.as_bytes()).map_err(LmdbError::from)?.is_some())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
