//! LMDB implementation of OnlineWeightStore.
//!
//! Keys are big-endian `time_ms` so LMDB's natural byte order matches
//! chronological order.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::online_weight::OnlineWeightStore;
use calyx_store::StoreError;
use calyx_types::Amount;

use crate::LmdbError;

pub struct LmdbOnlineWeightStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Bytes, Bytes>,
}

impl OnlineWeightStore for LmdbOnlineWeightStore {
    fn put(&self, time_ms: u64, weight: Amount) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, &time_ms.to_be_bytes(), &weight.to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, time_ms: u64) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.delete(&mut wtxn, &time_ms.to_be_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn begin(&self) -> Result<Vec<(u64, Amount)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for r in self.db.iter(&rtxn).map_err(LmdbError::from)? {
            let (k, v) = r.map_err(LmdbError::from)?;
            let time_ms = u64::from_be_bytes(k.try_into().map_err(|_| LmdbError::Serialization("bad time key".into()))?);
            let weight = Amount::from_be_bytes(v.try_into().map_err(|_| LmdbError::Serialization("bad weight value".into()))?);
            out.push((time_ms, weight));
        }
        Ok(out)
    }

    fn trim(&self, max_samples: usize) -> Result<usize, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let total = self.db.len(&rtxn).map_err(LmdbError::from)? as usize;
        if total <= max_samples {
            return Ok(0);
        }
        let to_drop = total - max_samples;
        let mut keys = Vec::with_capacity(to_drop);
        for r in self.db.iter(&rtxn).map_err(LmdbError::from)?.take(to_drop) {
            let (k, _) = r.map_err(LmdbError::from)?;
            keys.push(k.to_vec());
        }
        drop(rtxn);

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for key in &keys {
            self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(keys.len())
    }
}
