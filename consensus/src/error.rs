use fncon_types::{Nonce, ValidatorIndex};
use std::fmt;
use thiserror::Error;

/// Which part of a round's identity two vote sets disagree on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictReason {
    ChainId,
    FnId,
    Nonce,
    ResponseHash,
    ValidatorCount,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictReason::ChainId => "chain id differs",
            ConflictReason::FnId => "fn id differs",
            ConflictReason::Nonce => "nonce differs",
            ConflictReason::ResponseHash => "response hash differs",
            ConflictReason::ValidatorCount => "validator count differs",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteSetError {
    #[error("vote set conflict: {0}")]
    Conflict(ConflictReason),

    #[error("validator {0} already voted")]
    DuplicateVote(ValidatorIndex),

    #[error("validator index {index} out of range for {len} validators")]
    InvalidIndex { index: ValidatorIndex, len: u32 },

    #[error("oracle signature is empty")]
    EmptyOracleSignature,

    #[error("encoded vote set too large: {size} > {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),
}

/// Reasons a received vote set is not accepted into the merge path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: String, actual: String },

    #[error("unknown fn id {0}")]
    UnknownFn(String),

    #[error("bit array length {actual} does not match validator set size {expected}")]
    ValidatorCountMismatch { expected: u32, actual: u32 },

    #[error("bit array is malformed")]
    MalformedBitArray,

    #[error("{votes} votes but {flagged} flagged validators")]
    VoteCountMismatch { votes: usize, flagged: u32 },

    #[error("votes are not strictly ascending by validator index")]
    UnsortedVotes,

    #[error("vote from validator {0} is not flagged in the bit array")]
    UnflaggedVote(ValidatorIndex),

    #[error("vote from validator {0} carries an empty signature")]
    EmptySignature(ValidatorIndex),

    #[error("votes present without a response hash")]
    MissingResponseHash,

    #[error("signature of validator {0} does not verify")]
    InvalidSignature(ValidatorIndex),

    #[error("vote set already has a two-thirds majority at nonce {0}")]
    AlreadyFinalized(Nonce),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("fn id {0} is already used by another fn")]
    FnIdTaken(String),
}

/// Failure reported by an Fn implementation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("fn error: {0}")]
pub struct FnError(pub String);

/// Failure reported by a validator-set source.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("validator set unavailable: {0}")]
pub struct ProviderError(pub String);
