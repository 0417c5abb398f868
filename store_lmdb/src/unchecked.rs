//! LMDB implementation of UncheckedStore.
//!
//! Key format: `dependency_hash(32) ++ block_hash(32)`, so a prefix scan on
//! the dependency hash returns every entry waiting on it. Values are
//! hand-encoded (`modified:8 LE || block_bytes`) rather than bincode since
//! [`UncheckedInfo`] carries no serde derive — its `block_bytes` field is
//! already the wire-encoded block from `calyx-ledger`, re-encoding it would
//! be redundant.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::unchecked::{UncheckedInfo, UncheckedKey, UncheckedStore};
use calyx_store::StoreError;
use calyx_types::Hash;

use crate::LmdbError;

pub struct LmdbUncheckedStore {
    pub(crate) env: Arc<Env>,
    pub(crate) unchecked_db: Database<Bytes, Bytes>,
}

fn encode_key(key: &UncheckedKey) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(key.dependency.as_bytes());
    out[32..].copy_from_slice(key.block_hash.as_bytes());
    out
}

fn decode_key(bytes: &[u8]) -> Result<UncheckedKey, LmdbError> {
    if bytes.len() != 64 {
        return Err(LmdbError::Serialization("bad unchecked key length".into()));
    }
    let dependency: [u8; 32] = bytes[..32].try_into().unwrap();
    let block_hash: [u8; 32] = bytes[32..].try_into().unwrap();
    Ok(UncheckedKey { dependency: Hash::new(dependency), block_hash: Hash::new(block_hash) })
}

fn encode_value(info: &UncheckedInfo) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + info.block_bytes.len());
    out.extend_from_slice(&info.modified.to_le_bytes());
    out.extend_from_slice(&info.block_bytes);
    out
}

fn decode_value(bytes: &[u8]) -> Result<UncheckedInfo, LmdbError> {
    if bytes.len() < 8 {
        return Err(LmdbError::Serialization("bad unchecked value".into()));
    }
    let modified = u64::from_le_bytes(bytes[..8].try_into().unwrap());
    Ok(UncheckedInfo { modified, block_bytes: bytes[8..].to_vec() })
}

impl UncheckedStore for LmdbUncheckedStore {
    fn put(&self, key: &UncheckedKey, info: &UncheckedInfo) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.unchecked_db.put(&mut wtxn, &encode_key(key), &encode_value(info)).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, key: &UncheckedKey) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.unchecked_db.delete(&mut wtxn, &encode_key(key)).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.unchecked_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn get(&self, dependency: &Hash) -> Result<Vec<(UncheckedKey, UncheckedInfo)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let lower = dependency.as_bytes().to_vec();
        let mut upper = lower.clone();
        upper.extend_from_slice(&[0xFFu8; 32]);
        let bounds = (Bound::Included(lower.as_slice()), Bound::Included(upper.as_slice()));
        let mut out = Vec::new();
        for r in self.unchecked_db.range(&rtxn, &bounds).map_err(LmdbError::from)? {
            let (k, v) = r.map_err(LmdbError::from)?;
            if &k[..32] != dependency.as_bytes().as_slice() {
                continue;
            }
            out.push((decode_key(k)?, decode_value(v)?));
        }
        Ok(out)
    }

    fn drop_expired(&self, cutoff: u64) -> Result<usize, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut stale = Vec::new();
        for r in self.unchecked_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (k, v) = r.map_err(LmdbError::from)?;
            let info = decode_value(v)?;
            if info.modified < cutoff {
                stale.push(k.to_vec());
            }
        }
        drop(rtxn);

        let count = stale.len();
        if !stale.is_empty() {
            let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
            for key in &stale {
                self.unchecked_db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
            }
            wtxn.commit().map_err(LmdbError::from)?;
        }
        Ok(count)
    }
}
