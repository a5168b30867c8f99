//! Durable vote-set records.

use crate::StoreError;

/// One record per fn identifier holding the encoded active vote set.
///
/// `put_vote_set` must be durable when it returns: callers gossip the stored
/// value right after, and a restart must never lose a vote a peer has seen.
pub trait VoteSetStore: Send + Sync {
    /// Insert or overwrite the record for `fn_id`.
    fn put_vote_set(&self, fn_id: &str, encoded: &[u8]) -> Result<(), StoreError>;

    /// Read the record for `fn_id`.
    fn get_vote_set(&self, fn_id: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Every record as `(fn_id, encoded)`, in key order.
    fn iter_vote_sets(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError>;

    /// Number of records.
    fn vote_set_count(&self) -> Result<u64, StoreError>;
}
