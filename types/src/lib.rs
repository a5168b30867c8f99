//! Fundamental types for Fn-result consensus.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! validator addresses, keys and signatures, response hashes, validator sets and
//! the presence bit array carried by vote sets.

pub mod address;
pub mod bit_array;
pub mod error;
pub mod hash;
pub mod keys;
pub mod validator;

pub use address::ValidatorAddress;
pub use bit_array::BitArray;
pub use error::TypesError;
pub use hash::ResponseHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use validator::{Validator, ValidatorSet};

/// Round counter of an Fn. Advances monotonically; each value is one round.
pub type Nonce = u64;

/// Position of a validator in the canonical validator-set ordering.
pub type ValidatorIndex = u32;
