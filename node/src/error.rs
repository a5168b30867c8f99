use fncon_consensus::{FnError, ProviderError, VoteSetError};
use fncon_store::StoreError;
use fncon_store_lmdb::LmdbError;
use fncon_types::Nonce;
use thiserror::Error;

/// Failures of the gossip coordinator and the vote store behind it.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The durable write of a vote set failed. Fatal: the node must not keep
    /// gossiping state it cannot make durable.
    #[error("failed to persist vote set for {fn_id}: {source}")]
    Persistence {
        fn_id: String,
        #[source]
        source: StoreError,
    },

    #[error("stored vote set for {fn_id} cannot be decoded: {source}")]
    CorruptRecord {
        fn_id: String,
        #[source]
        source: VoteSetError,
    },

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("fn {0} is not registered")]
    UnknownFn(String),

    #[error("local node is not a validator")]
    NotAValidator,

    #[error("fn {fn_id} reports nonce {current} behind stored nonce {stored}")]
    StaleNonce {
        fn_id: String,
        stored: Nonce,
        current: Nonce,
    },

    #[error(transparent)]
    Fn(#[from] FnError),

    #[error(transparent)]
    Validators(#[from] ProviderError),

    #[error(transparent)]
    VoteSet(#[from] VoteSetError),
}

impl CoordinatorError {
    /// Whether the host should stop the node.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoordinatorError::Persistence { .. })
    }
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Lmdb(#[from] LmdbError),

    #[error("coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
