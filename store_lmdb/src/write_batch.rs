//! Write batching — groups multiple store operations into a single LMDB
//! write transaction, amortising the cost of the fsync that each commit
//! performs.
//!
//! If the batch is dropped without calling [`LmdbWriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).

use bincode;
use heed::RwTxn;

use calyx_store::account::AccountInfo;
use calyx_store::pending::{PendingInfo, PendingKey};
use calyx_store::write_batch::WriteBatch;
use calyx_store::StoreError;
use calyx_types::{Account, Hash};

use crate::environment::LmdbEnvironment;
use crate::{pending, rep_weights, LmdbError};

pub struct LmdbWriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> LmdbWriteBatch<'a> {
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, LmdbError> {
        let txn = env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }
}

impl<'a> WriteBatch for LmdbWriteBatch<'a> {
    fn put_block(&mut self, hash: &Hash, block_bytes: &[u8]) -> Result<(), StoreError> {
        self.env.blocks_db.put(&mut self.txn, hash.as_bytes(), block_bytes).map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_block(&mut self, hash: &Hash) -> Result<(), StoreError> {
        self.env.blocks_db.delete(&mut self.txn, hash.as_bytes()).map_err(LmdbError::from)?;
        Ok(())
    }

    fn put_frontier(&mut self, hash: &Hash, account: &Account) -> Result<(), StoreError> {
        self.env
            .frontiers_db
            .put(&mut self.txn, hash.as_bytes(), account.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_frontier(&mut self, hash: &Hash) -> Result<(), StoreError> {
        self.env.frontiers_db.delete(&mut self.txn, hash.as_bytes()).map_err(LmdbError::from)?;
        Ok(())
    }

    fn put_account(&mut self, account: &Account, info: &AccountInfo) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info).map_err(LmdbError::from)?;
        self.env.accounts_db.put(&mut self.txn, account.as_bytes(), &bytes).map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_account(&mut self, account: &Account) -> Result<(), StoreError> {
        self.env.accounts_db.delete(&mut self.txn, account.as_bytes()).map_err(LmdbError::from)?;
        Ok(())
    }

    fn put_pending(&mut self, key: &PendingKey, info: &PendingInfo) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info).map_err(LmdbError::from)?;
        self.env.pending_db.put(&mut self.txn, &pending::encode_key(key), &bytes).map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_pending(&mut self, key: &PendingKey) -> Result<(), StoreError> {
        self.env.pending_db.delete(&mut self.txn, &pending::encode_key(key)).map_err(LmdbError::from)?;
        Ok(())
    }

    fn put_rep_weight_delta(&mut self, representative: &Account, delta: i128) -> Result<(), StoreError> {
        rep_weights::apply_delta(self.env.rep_weights_db, &mut self.txn, representative, delta)?;
        Ok(())
    }

    fn put_confirmation_height(&mut self, account: &Account, height: u64, frontier: &Hash) -> Result<(), StoreError> {
        let info = calyx_store::confirmation_height::ConfirmationHeightInfo { height, frontier: *frontier };
        let bytes = bincode::serialize(&info).map_err(LmdbError::from)?;
        self.env
            .confirmation_height_db
            .put(&mut self.txn, account.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    fn put_pruned(&mut self, hash: &Hash) -> Result<(), StoreError> {
        self.env.pruned_db.put(&mut self.txn, hash.as_bytes(), &[]).map_err(LmdbError::from)?;
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calyx_store::block::BlockStore;
    use calyx_store::frontier::FrontierStore;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 30, 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    #[test]
    fn batch_put_block_and_frontier_committed() {
        let (_dir, env) = temp_env();

        let hash = Hash::new([1u8; 32]);
        let account = Account::new([9u8; 32]);
        let block_bytes = b"fake-block-data";

        let mut batch = env.write_batch().expect("write_batch");
        batch.put_block(&hash, block_bytes).expect("put_block");
        batch.put_frontier(&hash, &account).expect("put_frontier");
        Box::new(batch).commit().expect("commit");

        let block_store = env.block_store();
        let stored = block_store.get(&hash).expect("get").expect("present");
        assert_eq!(stored, block_bytes);

        let frontier_store = env.frontier_store();
        let owner = frontier_store.get(&hash).expect("get").expect("present");
        assert_eq!(owner, account);
    }

    #[test]
    fn dropped_batch_does_not_persist() {
        let (_dir, env) = temp_env();

        let hash = Hash::new([2u8; 32]);
        let block_bytes = b"should-not-persist";

        {
            let mut batch = env.write_batch().expect("write_batch");
            batch.put_block(&hash, block_bytes).expect("put_block");
        }

        let block_store = env.block_store();
        assert!(block_store.get(&hash).expect("get").is_none());
    }

    #[test]
    fn batch_multiple_blocks() {
        let (_dir, env) = temp_env();

        let mut batch = env.write_batch().expect("write_batch");
        let hashes: Vec<Hash> = (0..10u8)
            .map(|i| {
                let mut bytes = [0u8; 32];
                bytes[0] = i;
                Hash::new(bytes)
            })
            .collect();

        for (i, hash) in hashes.iter().enumerate() {
            batch.put_block(hash, format!("block-{i}").as_bytes()).expect("put_block");
        }
        Box::new(batch).commit().expect("commit");

        let block_store = env.block_store();
        for (i, hash) in hashes.iter().enumerate() {
            let stored = block_store.get(hash).expect("get").expect("present");
            assert_eq!(stored, format!("block-{i}").as_bytes());
        }
    }

    #[test]
    fn batch_delete_block() {
        let (_dir, env) = temp_env();
        let hash = Hash::new([3u8; 32]);

        let mut batch = env.write_batch().expect("write_batch");
        batch.put_block(&hash, b"to-be-deleted").expect("put_block");
        Box::new(batch).commit().expect("commit");

        let mut batch = env.write_batch().expect("write_batch");
        batch.delete_block(&hash).expect("delete_block");
        Box::new(batch).commit().expect("commit");

        assert!(env.block_store().get(&hash).expect("get").is_none());
    }
}
