//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the gossip layer (storage, peers, Fn
//! implementations, the validator set) sits behind a trait. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including failure injection
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod consensus_fn;
pub mod network;
pub mod store;
pub mod validators;

pub use consensus_fn::NullFn;
pub use network::{Envelope, NullPeer};
pub use store::NullVoteSetStore;
pub use validators::TestValidators;

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering the data if a panicking test poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
