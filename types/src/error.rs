//! Top-level error type for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid validator address: {0}")]
    InvalidAddress(String),

    #[error("duplicate validator address {0} in validator set")]
    DuplicateValidator(String),

    #[error("validator set is empty")]
    EmptyValidatorSet,
}
