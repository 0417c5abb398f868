//! LMDB implementation of BlockStore.
//!
//! Stored values are `sideband(72 bytes) ++ block_wire_bytes`, where the
//! sideband prefix is `account(32) || successor(32) || height(8 BE)`. This
//! fixed layout is the byte-level contract between `calyx-ledger` (which
//! writes it) and this crate (which only needs `account`/`successor`
//! without decoding the full block).

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::block::BlockStore;
use calyx_store::StoreError;
use calyx_types::{Account, Hash};

use crate::LmdbError;

const SIDEBAND_LEN: usize = 72;

pub struct LmdbBlockStore {
    pub(crate) env: Arc<Env>,
    pub(crate) blocks_db: Database<Bytes, Bytes>,
}

impl BlockStore for LmdbBlockStore {
    fn put(&self, hash: &Hash, block_bytes: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.blocks_db.put(&mut wtxn, hash.as_bytes(), block_bytes).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.blocks_db.get(&rtxn, hash.as_bytes()).map_err(LmdbError::from)?.map(|b| b.to_vec()))
    }

    fn del(&self, hash: &Hash) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.blocks_db.delete(&mut wtxn, hash.as_bytes()).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn exists(&self, hash: &Hash) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.blocks_db.get(&rtxn, hash.as_bytes()).map_err(LmdbError::from)?.is_some())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.blocks_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn successor(&self, hash: &Hash) -> Result<Option<Hash>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.blocks_db.get(&rtxn, hash.as_bytes()).map_err(LmdbError::from)?;
        match val {
            Some(bytes) if bytes.len() >= SIDEBAND_LEN => {
                let successor: [u8; 32] = bytes[32..64].try_into().unwrap();
                if successor == [0u8; 32] {
                    Ok(None)
                } else {
                    Ok(Some(Hash::new(successor)))
                }
            }
            Some(_) => Err(LmdbError::Serialization("block value missing sideband".into()).into()),
            None => Ok(None),
        }
    }

    fn account(&self, hash: &Hash) -> Result<Option<Account>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.blocks_db.get(&rtxn, hash.as_bytes()).map_err(LmdbError::from)?;
        match val {
            Some(bytes) if bytes.len() >= SIDEBAND_LEN => {
                let account: [u8; 32] = bytes[..32].try_into().unwrap();
                Ok(Some(Account::new(account)))
            }
            Some(_) => Err(LmdbError::Serialization("block value missing sideband".into()).into()),
            None => Ok(None),
        }
    }
}
