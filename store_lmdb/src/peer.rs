//! LMDB implementation of PeerStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::peer::PeerStore;
use calyx_store::StoreError;

use crate::LmdbError;

pub struct LmdbPeerStore {
    pub(crate) env: Arc<Env>,
    pub(crate) peers_db: Database<Bytes, Bytes>,
}

impl PeerStore for LmdbPeerStore {
    fn put(&self, endpoint: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.peers_db.put(&mut wtxn, endpoint.as_bytes(), &[]).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn del(&self, endpoint: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.peers_db.delete(&mut wtxn, endpoint.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, endpoint: &str) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.peers_db.get(&rtxn, endpoint.as_bytes()).map_err(LmdbError::from)?.is_some())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.peers_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn begin(&self) -> Result<Vec<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for r in self.peers_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (k, _) = r.map_err(LmdbError::from)?;
            let s = std::str::from_utf8(k).map_err(|e| LmdbError::Serialization(e.to_string()))?;
            out.push(s.to_string());
        }
        Ok(out)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.peers_db.clear(&mut wtxn).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
