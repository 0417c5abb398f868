//! LMDB implementation of RepWeightStore.
//!
//! Maintained incrementally: `WriteBatch::put_rep_weight_delta` is the only
//! writer, applying signed deltas as sends/receives move balance between
//! representatives. There is no `put` that replaces a weight wholesale.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use calyx_store::write_batch::RepWeightStore;
use calyx_store::StoreError;
use calyx_types::{Account, Amount};

use crate::LmdbError;

pub struct LmdbRepWeightStore {
    pub(crate) env: Arc<Env>,
    pub(crate) db: Database<Bytes, Bytes>,
}

impl RepWeightStore for LmdbRepWeightStore {
    fn weight(&self, representative: &Account) -> Result<Amount, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.db.get(&rtxn, representative.as_bytes()).map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 16] = bytes.try_into().map_err(|_| LmdbError::Serialization("bad weight value".into()))?;
                Ok(Amount::from_be_bytes(arr))
            }
            None => Ok(Amount::ZERO),
        }
    }

    fn begin(&self) -> Result<Vec<(Account, Amount)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for r in self.db.iter(&rtxn).map_err(LmdbError::from)? {
            let (k, v) = r.map_err(LmdbError::from)?;
            let account: [u8; 32] = k.try_into().map_err(|_| LmdbError::Serialization("bad rep key".into()))?;
            let weight: [u8; 16] = v.try_into().map_err(|_| LmdbError::Serialization("bad weight value".into()))?;
            out.push((Account::new(account), Amount::from_be_bytes(weight)));
        }
        Ok(out)
    }
}

/// Reads the stored weight for `representative` inside an already-open
/// write transaction, applies `delta`, and writes the result back. Shared
/// by [`crate::write_batch::LmdbWriteBatch`].
pub(crate) fn apply_delta(
    db: Database<Bytes, Bytes>,
    wtxn: &mut heed::RwTxn<'_>,
    representative: &Account,
    delta: i128,
) -> Result<(), LmdbError> {
    let current = db
        .get(wtxn, representative.as_bytes())
        .map_err(LmdbError::from)?
        .map(|b| {
            let arr: [u8; 16] = b.try_into().unwrap_or([0u8; 16]);
            Amount::from_be_bytes(arr).raw() as i128
        })
        .unwrap_or(0);
    let updated = (current + delta).max(0) as u128;
    db.put(wtxn, representative.as_bytes(), &Amount::new(updated).to_be_bytes())
        .map_err(LmdbError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_env() -> crate::LmdbEnvironment {
        let dir = tempfile::tempdir().unwrap();
        crate::LmdbEnvironment::open(dir.path(), 30, 1 << 20).unwrap()
    }

    #[test]
    fn empty_store_returns_zero() {
        let env = open_test_env();
        let store = env.rep_weight_store();
        assert_eq!(store.weight(&Account::new([1u8; 32])).unwrap(), Amount::ZERO);
        assert!(store.begin().unwrap().is_empty());
    }

    #[test]
    fn delta_accumulates_and_floors_at_zero() {
        let env = open_test_env();
        let rep = Account::new([7u8; 32]);
        {
            let mut wtxn = env.env().write_txn().unwrap();
            apply_delta(env.rep_weight_store().db, &mut wtxn, &rep, 500).unwrap();
            apply_delta(env.rep_weight_store().db, &mut wtxn, &rep, -200).unwrap();
            wtxn.commit().unwrap();
        }
        let store = env.rep_weight_store();
        assert_eq!(store.weight(&rep).unwrap().raw(), 300);

        {
            let mut wtxn = env.env().write_txn().unwrap();
            apply_delta(env.rep_weight_store().db, &mut wtxn, &rep, -10_000).unwrap();
            wtxn.commit().unwrap();
        }
        assert_eq!(env.rep_weight_store().weight(&rep).unwrap(), Amount::ZERO);
    }
}
