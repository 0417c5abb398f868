//! LMDB environment setup.
//!
//! One `heed::Env` backs every table; each table is its own named LMDB
//! sub-database within that environment so a single write transaction can
//! span all of them atomically.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

pub(crate) const DB_ACCOUNTS: &str = "accounts";
pub(crate) const DB_BLOCKS: &str = "blocks";
pub(crate) const DB_PENDING: &str = "pending";
pub(crate) const DB_CONFIRMATION_HEIGHT: &str = "confirmation_height";
pub(crate) const DB_FRONTIERS: &str = "frontiers";
pub(crate) const DB_UNCHECKED: &str = "unchecked";
pub(crate) const DB_ONLINE_WEIGHT: &str = "online_weight";
pub(crate) const DB_PEERS: &str = "peers";
pub(crate) const DB_PRUNED: &str = "pruned";
pub(crate) const DB_FINAL_VOTE: &str = "final_vote";
pub(crate) const DB_META: &str = "meta";
pub(crate) const DB_REP_WEIGHTS: &str = "rep_weights";

const NUM_DATABASES: u32 = 12;

/// Wraps the LMDB environment and every table's database handle.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) accounts_db: Database<Bytes, Bytes>,
    pub(crate) blocks_db: Database<Bytes, Bytes>,
    pub(crate) pending_db: Database<Bytes, Bytes>,
    pub(crate) confirmation_height_db: Database<Bytes, Bytes>,
    pub(crate) frontiers_db: Database<Bytes, Bytes>,
    pub(crate) unchecked_db: Database<Bytes, Bytes>,
    pub(crate) online_weight_db: Database<Bytes, Bytes>,
    pub(crate) peers_db: Database<Bytes, Bytes>,
    pub(crate) pruned_db: Database<Bytes, Bytes>,
    pub(crate) final_vote_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) rep_weights_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path, creating any
    /// table database that doesn't already exist.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("failed to create data dir: {e}")))?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs.max(NUM_DATABASES))
                .open(path)
        }
        .map_err(LmdbError::from)?;

        let mut wtxn = env.write_txn().map_err(LmdbError::from)?;
        let accounts_db = env.create_database(&mut wtxn, Some(DB_ACCOUNTS)).map_err(LmdbError::from)?;
        let blocks_db = env.create_database(&mut wtxn, Some(DB_BLOCKS)).map_err(LmdbError::from)?;
        let pending_db = env.create_database(&mut wtxn, Some(DB_PENDING)).map_err(LmdbError::from)?;
        let confirmation_height_db = env
            .create_database(&mut wtxn, Some(DB_CONFIRMATION_HEIGHT))
            .map_err(LmdbError::from)?;
        let frontiers_db = env.create_database(&mut wtxn, Some(DB_FRONTIERS)).map_err(LmdbError::from)?;
        let unchecked_db = env.create_database(&mut wtxn, Some(DB_UNCHECKED)).map_err(LmdbError::from)?;
        let online_weight_db = env
            .create_database(&mut wtxn, Some(DB_ONLINE_WEIGHT))
            .map_err(LmdbError::from)?;
        let peers_db = env.create_database(&mut wtxn, Some(DB_PEERS)).map_err(LmdbError::from)?;
        let pruned_db = env.create_database(&mut wtxn, Some(DB_PRUNED)).map_err(LmdbError::from)?;
        let final_vote_db = env.create_database(&mut wtxn, Some(DB_FINAL_VOTE)).map_err(LmdbError::from)?;
        let meta_db = env.create_database(&mut wtxn, Some(DB_META)).map_err(LmdbError::from)?;
        let rep_weights_db = env.create_database(&mut wtxn, Some(DB_REP_WEIGHTS)).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        Ok(Self {
            env: Arc::new(env),
            accounts_db,
            blocks_db,
            pending_db,
            confirmation_height_db,
            frontiers_db,
            unchecked_db,
            online_weight_db,
            peers_db,
            pruned_db,
            final_vote_db,
            meta_db,
            rep_weights_db,
        })
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn account_store(&self) -> crate::account::LmdbAccountStore {
        crate::account::LmdbAccountStore { env: self.env.clone(), accounts_db: self.accounts_db }
    }

    pub fn block_store(&self) -> crate::block::LmdbBlockStore {
        crate::block::LmdbBlockStore { env: self.env.clone(), blocks_db: self.blocks_db }
    }

    pub fn pending_store(&self) -> crate::pending::LmdbPendingStore {
        crate::pending::LmdbPendingStore { env: self.env.clone(), pending_db: self.pending_db }
    }

    pub fn confirmation_height_store(&self) -> crate::confirmation_height::LmdbConfirmationHeightStore {
        crate::confirmation_height::LmdbConfirmationHeightStore {
            env: self.env.clone(),
            db: self.confirmation_height_db,
        }
    }

    pub fn frontier_store(&self) -> crate::frontier::LmdbFrontierStore {
        crate::frontier::LmdbFrontierStore { env: self.env.clone(), frontiers_db: self.frontiers_db }
    }

    pub fn unchecked_store(&self) -> crate::unchecked::LmdbUncheckedStore {
        crate::unchecked::LmdbUncheckedStore { env: self.env.clone(), unchecked_db: self.unchecked_db }
    }

    pub fn online_weight_store(&self) -> crate::online_weight::LmdbOnlineWeightStore {
        crate::online_weight::LmdbOnlineWeightStore { env: self.env.clone(), db: self.online_weight_db }
    }

    pub fn peer_store(&self) -> crate::peer::LmdbPeerStore {
        crate::peer::LmdbPeerStore { env: self.env.clone(), peers_db: self.peers_db }
    }

    pub fn pruned_store(&self) -> crate::pruned::LmdbPrunedStore {
        crate::pruned::LmdbPrunedStore { env: self.env.clone(), pruned_db: self.pruned_db }
    }

    pub fn final_vote_store(&self) -> crate::final_vote::LmdbFinalVoteStore {
        crate::final_vote::LmdbFinalVoteStore { env: self.env.clone(), db: self.final_vote_db }
    }

    pub fn meta_store(&self) -> crate::meta::LmdbMetaStore {
        crate::meta::LmdbMetaStore { env: self.env.clone(), meta_db: self.meta_db }
    }

    pub fn rep_weight_store(&self) -> crate::rep_weights::LmdbRepWeightStore {
        crate::rep_weights::LmdbRepWeightStore { env: self.env.clone(), db: self.rep_weights_db }
    }

    pub fn write_batch(&self) -> Result<crate::write_batch::LmdbWriteBatch<'_>, LmdbError> {
        crate::write_batch::LmdbWriteBatch::new(self)
    }
}
