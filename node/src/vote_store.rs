//! Durable per-fn vote-set state.
//!
//! The in-memory map is a cache of the backend: every update is written
//! durably first and only then becomes visible through [`VoteStore::get`].
//! Nothing else in the node writes vote-set records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fncon_consensus::VoteSet;
use fncon_store::VoteSetStore;

use crate::error::CoordinatorError;

pub struct VoteStore {
    backend: Arc<dyn VoteSetStore>,
    sets: RwLock<HashMap<String, VoteSet>>,
}

impl VoteStore {
    /// Read every persisted record. A record that does not decode aborts the
    /// load: dropping it could lead this node to sign twice in one round.
    pub fn load(backend: Arc<dyn VoteSetStore>) -> Result<Self, CoordinatorError> {
        let mut sets = HashMap::new();
        for (fn_id, bytes) in backend.iter_vote_sets()? {
            let vote_set = VoteSet::decode(&bytes).map_err(|source| {
                CoordinatorError::CorruptRecord {
                    fn_id: fn_id.clone(),
                    source,
                }
            })?;
            sets.insert(fn_id, vote_set);
        }
        tracing::debug!(count = sets.len(), "loaded persisted vote sets");
        Ok(Self {
            backend,
            sets: RwLock::new(sets),
        })
    }

    pub fn get(&self, fn_id: &str) -> Option<VoteSet> {
        let sets = self.sets.read().unwrap_or_else(|e| e.into_inner());
        sets.get(fn_id).cloned()
    }

    /// Persist `vote_set` as the record for `fn_id`, then cache it.
    ///
    /// Returns the encoded bytes that were written. On failure the cached
    /// value is unchanged.
    pub fn put(&self, fn_id: &str, vote_set: &VoteSet) -> Result<Vec<u8>, CoordinatorError> {
        let encoded = vote_set.encode()?;
        self.backend
            .put_vote_set(fn_id, &encoded)
            .map_err(|source| CoordinatorError::Persistence {
                fn_id: fn_id.to_string(),
                source,
            })?;
        let mut sets = self.sets.write().unwrap_or_else(|e| e.into_inner());
        sets.insert(fn_id.to_string(), vote_set.clone());
        Ok(encoded)
    }

    pub fn fn_ids(&self) -> Vec<String> {
        let sets = self.sets.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = sets.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sets.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
