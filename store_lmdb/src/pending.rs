//! LMDB implementation of PendingStore.
//!
//! Key format: `account_bytes(32) ++ source_hash_bytes(32)` — a fixed-width
//! binary composite key, so a prefix scan on the account bytes alone
//! returns every pending entry for that account in hash order.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::pending::{PendingInfo, PendingKey, PendingStore};
use calyx_store::StoreError;
use calyx_types::{Account, Hash};

use crate::LmdbError;

pub struct LmdbPendingStore {
    pub(crate) env: Arc<Env>,
    pub(crate) pending_db: Database<Bytes, Bytes>,
}

pub(crate) fn encode_key(key: &PendingKey) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(key.account.as_bytes());
    out[32..].copy_from_slice(key.hash.as_bytes());
    out
}

fn decode_key(bytes: &[u8]) -> Result<PendingKey, LmdbError> {
    if bytes.len() != 64 {
        return Err(LmdbError::Serialization("bad pending key length".into()));
    }
    let account: [u8; 32] = bytes[..32].try_into().unwrap();
    let hash: [u8; 32] = bytes[32..].try_into().unwrap();
    Ok(PendingKey { account: Account::new(account), hash: Hash::new(hash) })
}

impl PendingStore for LmdbPendingStore {
    fn get(&self, key: &PendingKey) -> Result<Option<PendingInfo>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.pending_db.get(&rtxn, &encode_key(key)).map_err(LmdbError::from)?;
        val.map(|b| bincode::deserialize(b).map_err(LmdbError::from).map_err(Into::into)).transpose()
    }

    fn put(&self, key: &PendingKey, info: &PendingInfo) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.pending_db.put(&mut wtxn, &encode_key(key), &bytes).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, key: &PendingKey) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.pending_db.delete(&mut wtxn, &encode_key(key)).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, key: &PendingKey) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.pending_db.get(&rtxn, &encode_key(key)).map_err(LmdbError::from)?.is_some())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.pending_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn for_account(&self, account: &Account) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let lower = account.as_bytes().to_vec();
        let mut upper = lower.clone();
        upper.extend_from_slice(&[0xFFu8; 32]);
        let bounds = (Bound::Included(lower.as_slice()), Bound::Included(upper.as_slice()));
        let mut out = Vec::new();
        for r in self.pending_db.range(&rtxn, &bounds).map_err(LmdbError::from)? {
            let (k, v) = r.map_err(LmdbError::from)?;
            if &k[..32] != account.as_bytes().as_slice() {
                continue;
            }
            let key = decode_key(k)?;
            let info: PendingInfo = bincode::deserialize(v).map_err(LmdbError::from)?;
            out.push((key, info));
        }
        Ok(out)
    }

    fn begin(&self, start: Option<&PendingKey>) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        let mut collect = |k: &[u8], v: &[u8]| -> Result<(), StoreError> {
            let key = decode_key(k)?;
            let info: PendingInfo = bincode::deserialize(v).map_err(LmdbError::from)?;
            out.push((key, info));
            Ok(())
        };
        match start {
            Some(from) => {
                let encoded = encode_key(from);
                let bounds = (Bound::Included(encoded.as_slice()), Bound::<&[u8]>::Unbounded);
                for r in self.pending_db.range(&rtxn, &bounds).map_err(LmdbError::from)? {
                    let (k, v) = r.map_err(LmdbError::from)?;
                    collect(k, v)?;
                }
            }
            None => {
                for r in self.pending_db.iter(&rtxn).map_err(LmdbError::from)? {
                    let (k, v) = r.map_err(LmdbError::from)?;
                    collect(k, v)?;
                }
            }
        }
        Ok(out)
    }
}
