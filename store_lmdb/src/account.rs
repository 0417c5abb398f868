//! LMDB implementation of AccountStore.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::account::{AccountInfo, AccountStore};
use calyx_store::StoreError;
use calyx_types::Account;

use crate::LmdbError;

pub struct LmdbAccountStore {
    pub(crate) env: Arc<Env>,
    pub(crate) accounts_db: Database<Bytes, Bytes>,
}

impl AccountStore for LmdbAccountStore {
    fn get(&self, account: &Account) -> Result<Option<AccountInfo>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.accounts_db.get(&rtxn, account.as_bytes()).map_err(LmdbError::from)?;
        val.map(|bytes| bincode::deserialize(bytes).map_err(LmdbError::from).map_err(Into::into))
            .transpose()
    }

    fn put(&self, account: &Account, info: &AccountInfo) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.accounts_db.put(&mut wtxn, account.as_bytes(), &bytes).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, account: &Account) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.accounts_db.delete(&mut wtxn, account.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, account: &Account) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.accounts_db.get(&rtxn, account.as_bytes()).map_err(LmdbError::from)?.is_some())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.accounts_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn begin(&self, start: Option<&Account>) -> Result<Vec<(Account, AccountInfo)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        let push = |out: &mut Vec<(Account, AccountInfo)>, key: &[u8], val: &[u8]| -> Result<(), StoreError> {
            let arr: [u8; 32] = key.try_into().map_err(|_| LmdbError::Serialization("bad account key".into()))?;
            let info: AccountInfo = bincode::deserialize(val).map_err(LmdbError::from)?;
            out.push((Account::new(arr), info));
            Ok(())
        };
        match start {
            Some(from) => {
                let bounds = (Bound::Included(from.as_bytes().as_slice()), Bound::<&[u8]>::Unbounded);
                for r in self.accounts_db.range(&rtxn, &bounds).map_err(LmdbError::from)? {
                    let (k, v) = r.map_err(LmdbError::from)?;
                    push(&mut out, k, v)?;
                }
            }
            None => {
                for r in self.accounts_db.iter(&rtxn).map_err(LmdbError::from)? {
                    let (k, v) = r.map_err(LmdbError::from)?;
                    push(&mut out, k, v)?;
                }
            }
        }
        Ok(out)
    }
}
