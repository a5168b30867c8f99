//! Fn capabilities and the registry that maps identifiers to them.
//!
//! An Fn is the external computation whose result validators agree on. The
//! registry is filled once while the node is wired together; an identifier
//! can never be re-bound.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fncon_types::{Nonce, ResponseHash};

use crate::error::{FnError, RegistryError};
use crate::vote_set::SignedVote;

/// The local node's answer for the current round of an Fn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FnResponse {
    pub hash: ResponseHash,
    /// The Fn's own signature over `hash`, produced by this node.
    pub oracle_signature: Vec<u8>,
}

/// A function whose result the validator set agrees on.
pub trait ConsensusFn: Send + Sync {
    /// Current round. Advances monotonically.
    fn nonce(&self) -> Result<Nonce, FnError>;

    /// Result hash for the current round plus this node's signature over it.
    fn current_result(&self) -> Result<FnResponse, FnError>;

    /// Called once per round with the agreed hash and every vote, ordered by
    /// validator index.
    fn deliver_finalized(&self, hash: &ResponseHash, votes: &[SignedVote]);
}

/// Lookup from fn identifier to its capability.
pub trait FnRegistry: Send + Sync {
    fn get(&self, fn_id: &str) -> Option<Arc<dyn ConsensusFn>>;

    /// Bind `fn_id`. Fails if the identifier is already bound; the existing
    /// binding is kept.
    fn set(&self, fn_id: &str, fn_obj: Arc<dyn ConsensusFn>) -> Result<(), RegistryError>;

    fn contains(&self, fn_id: &str) -> bool {
        self.get(fn_id).is_some()
    }
}

/// Transient registry, rebuilt on every start.
#[derive(Default)]
pub struct InMemoryFnRegistry {
    fns: RwLock<HashMap<String, Arc<dyn ConsensusFn>>>,
}

impl InMemoryFnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered identifiers, sorted.
    pub fn fn_ids(&self) -> Vec<String> {
        let fns = self.fns.read().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = fns.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl FnRegistry for InMemoryFnRegistry {
    fn get(&self, fn_id: &str) -> Option<Arc<dyn ConsensusFn>> {
        let fns = self.fns.read().unwrap_or_else(|e| e.into_inner());
        fns.get(fn_id).cloned()
    }

    fn set(&self, fn_id: &str, fn_obj: Arc<dyn ConsensusFn>) -> Result<(), RegistryError> {
        let mut fns = self.fns.write().unwrap_or_else(|e| e.into_inner());
        if fns.contains_key(fn_id) {
            return Err(RegistryError::FnIdTaken(fn_id.to_string()));
        }
        fns.insert(fn_id.to_string(), fn_obj);
        tracing::debug!(fn_id, "registered fn");
        Ok(())
    }
}
