//! Nullable vote-set store: thread-safe in-memory storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use fncon_store::{StoreError, VoteSetStore};

use crate::lock;

/// An in-memory [`VoteSetStore`] whose writes can be made to fail.
#[derive(Default)]
pub struct NullVoteSetStore {
    records: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl NullVoteSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put_vote_set` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Seed a record directly, bypassing failure injection.
    pub fn insert_raw(&self, fn_id: &str, encoded: Vec<u8>) {
        lock(&self.records).insert(fn_id.to_string(), encoded);
    }
}

impl VoteSetStore for NullVoteSetStore {
    fn put_vote_set(&self, fn_id: &str, encoded: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(format!(
                "injected write failure for {fn_id}"
            )));
        }
        lock(&self.records).insert(fn_id.to_string(), encoded.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_vote_set(&self, fn_id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(lock(&self.records).get(fn_id).cloned())
    }

    fn iter_vote_sets(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        Ok(lock(&self.records)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn vote_set_count(&self) -> Result<u64, StoreError> {
        Ok(lock(&self.records).len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_overwrite() {
        let store = NullVoteSetStore::new();
        store.put_vote_set("a", b"one").unwrap();
        store.put_vote_set("a", b"two").unwrap();
        assert_eq!(store.get_vote_set("a").unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.vote_set_count().unwrap(), 1);
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn injected_failure_keeps_previous_value() {
        let store = NullVoteSetStore::new();
        store.put_vote_set("a", b"one").unwrap();
        store.set_fail_writes(true);
        assert!(store.put_vote_set("a", b"two").is_err());
        assert_eq!(store.get_vote_set("a").unwrap(), Some(b"one".to_vec()));

        store.set_fail_writes(false);
        store.put_vote_set("a", b"two").unwrap();
        assert_eq!(store.get_vote_set("a").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn iteration_is_key_ordered() {
        let store = NullVoteSetStore::new();
        store.insert_raw("b", vec![2]);
        store.insert_raw("a", vec![1]);
        let keys: Vec<String> = store
            .iter_vote_sets()
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
