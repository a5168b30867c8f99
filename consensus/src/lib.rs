//! Consensus on externally computed Fn results via vote-set aggregation.
//!
//! Validators sign the result hash an Fn produced for a round (its nonce) and
//! exchange partial signature sets. Merging two sets for the same round is a
//! bitmap union plus an ordered insert of the missing signatures, so sets
//! converge regardless of the path votes took. A set is final once the
//! flagged voting power is strictly greater than two thirds of the total.
//!
//! ## Module overview
//!
//! - [`vote_set`]: the vote set: creation, validation, merge, signing, codec.
//! - [`fn_registry`]: Fn capability trait and the append-only registry.
//! - [`validators`]: source of the current validator set.
//! - [`error`]: error types.

pub mod error;
pub mod fn_registry;
pub mod validators;
pub mod vote_set;

pub use error::{
    ConflictReason, FnError, ProviderError, RegistryError, ValidationError, VoteSetError,
};
pub use fn_registry::{ConsensusFn, FnRegistry, FnResponse, InMemoryFnRegistry};
pub use validators::{StaticValidatorSet, ValidatorSetProvider};
pub use vote_set::{vote_subject, SignedVote, VoteSet, MAX_ENCODED_VOTE_SET};
