//! LMDB implementation of VoteSetStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use fncon_store::{StoreError, VoteSetStore};

use crate::LmdbError;

pub struct LmdbVoteSetStore {
    pub(crate) env: Arc<Env>,
    pub(crate) vote_sets_db: Database<Bytes, Bytes>,
}

impl VoteSetStore for LmdbVoteSetStore {
    fn put_vote_set(&self, fn_id: &str, encoded: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.vote_sets_db
            .put(&mut wtxn, fn_id.as_bytes(), encoded)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_vote_set(&self, fn_id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .vote_sets_db
            .get(&rtxn, fn_id.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.map(|bytes| bytes.to_vec()))
    }

    fn iter_vote_sets(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.vote_sets_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut result = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let fn_id = std::str::from_utf8(key).map_err(|_| {
                StoreError::Corruption(format!("vote set key is not UTF-8: {key:?}"))
            })?;
            result.push((fn_id.to_string(), val.to_vec()));
        }
        Ok(result)
    }

    fn vote_set_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.vote_sets_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
