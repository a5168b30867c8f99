//! Abstract storage traits.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod error;
pub mod meta;
pub mod vote_set;

pub use error::StoreError;
pub use meta::MetaStore;
pub use vote_set::VoteSetStore;
