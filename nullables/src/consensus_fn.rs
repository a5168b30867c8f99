//! Nullable Fn: a programmable result source that records deliveries.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use fncon_consensus::{ConsensusFn, FnError, FnResponse, SignedVote};
use fncon_types::{Nonce, ResponseHash};

use crate::lock;

/// An Fn whose nonce and result are set by the test.
pub struct NullFn {
    nonce: AtomicU64,
    response: Mutex<FnResponse>,
    failing: AtomicBool,
    delivered: Mutex<Vec<(ResponseHash, Vec<SignedVote>)>>,
}

impl NullFn {
    pub fn new(nonce: Nonce, response: FnResponse) -> Self {
        Self {
            nonce: AtomicU64::new(nonce),
            response: Mutex::new(response),
            failing: AtomicBool::new(false),
            delivered: Mutex::new(Vec::new()),
        }
    }

    /// Result hash filled with `byte` and a fixed non-empty oracle signature.
    pub fn with_hash(nonce: Nonce, byte: u8) -> Self {
        Self::new(
            nonce,
            FnResponse {
                hash: ResponseHash::new([byte; 32]),
                oracle_signature: vec![0x0F, byte],
            },
        )
    }

    pub fn set_nonce(&self, nonce: Nonce) {
        self.nonce.store(nonce, Ordering::SeqCst);
    }

    pub fn set_response(&self, response: FnResponse) {
        *lock(&self.response) = response;
    }

    /// Make `nonce` and `current_result` report an error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn deliveries(&self) -> Vec<(ResponseHash, Vec<SignedVote>)> {
        lock(&self.delivered).clone()
    }

    pub fn delivery_count(&self) -> usize {
        lock(&self.delivered).len()
    }
}

impl ConsensusFn for NullFn {
    fn nonce(&self) -> Result<Nonce, FnError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FnError("null fn set to fail".into()));
        }
        Ok(self.nonce.load(Ordering::SeqCst))
    }

    fn current_result(&self) -> Result<FnResponse, FnError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FnError("null fn set to fail".into()));
        }
        Ok(lock(&self.response).clone())
    }

    fn deliver_finalized(&self, hash: &ResponseHash, votes: &[SignedVote]) {
        lock(&self.delivered).push((*hash, votes.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_configured_values() {
        let f = NullFn::with_hash(3, 7);
        assert_eq!(f.nonce().unwrap(), 3);
        assert_eq!(f.current_result().unwrap().hash, ResponseHash::new([7; 32]));
        f.set_nonce(4);
        assert_eq!(f.nonce().unwrap(), 4);
    }

    #[test]
    fn failing_fn_errors() {
        let f = NullFn::with_hash(1, 1);
        f.set_failing(true);
        assert!(f.nonce().is_err());
        assert!(f.current_result().is_err());
    }

    #[test]
    fn records_deliveries() {
        let f = NullFn::with_hash(1, 1);
        f.deliver_finalized(&ResponseHash::new([1; 32]), &[]);
        assert_eq!(f.delivery_count(), 1);
        assert_eq!(f.deliveries()[0].0, ResponseHash::new([1; 32]));
    }
}
