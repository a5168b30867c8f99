//! Validator set: the ordered list of validators and their voting power.
//!
//! Vote-set bit positions index into this ordering, so the order must be the
//! same on every node for a given height.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{PublicKey, TypesError, ValidatorAddress, ValidatorIndex};

/// A single validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub address: ValidatorAddress,
    pub public_key: PublicKey,
    pub voting_power: u64,
}

impl Validator {
    /// Build a validator, deriving its address from the public key.
    pub fn new(public_key: PublicKey, voting_power: u64) -> Self {
        Self {
            address: ValidatorAddress::from_public_key(&public_key),
            public_key,
            voting_power,
        }
    }
}

/// Ordered validator set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    total_power: u128,
}

impl ValidatorSet {
    /// Build a set, rejecting empty input and duplicate addresses.
    pub fn new(validators: Vec<Validator>) -> Result<Self, TypesError> {
        if validators.is_empty() {
            return Err(TypesError::EmptyValidatorSet);
        }
        let mut seen = HashSet::with_capacity(validators.len());
        for v in &validators {
            if !seen.insert(v.address) {
                return Err(TypesError::DuplicateValidator(v.address.to_string()));
            }
        }
        let total_power = validators.iter().map(|v| v.voting_power as u128).sum();
        Ok(Self {
            validators,
            total_power,
        })
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Size as a bit-array length.
    pub fn size(&self) -> u32 {
        self.validators.len() as u32
    }

    pub fn get(&self, index: ValidatorIndex) -> Option<&Validator> {
        self.validators.get(index as usize)
    }

    /// Address → index lookup.
    pub fn index_of(&self, address: &ValidatorAddress) -> Option<ValidatorIndex> {
        self.validators
            .iter()
            .position(|v| &v.address == address)
            .map(|i| i as ValidatorIndex)
    }

    pub fn contains(&self, address: &ValidatorAddress) -> bool {
        self.index_of(address).is_some()
    }

    /// Voting power of the validator at `index`, zero if out of range.
    pub fn power_at(&self, index: ValidatorIndex) -> u64 {
        self.get(index).map(|v| v.voting_power).unwrap_or(0)
    }

    pub fn total_power(&self) -> u128 {
        self.total_power
    }

    /// Summed power of the given indices. Out-of-range indices count as zero.
    pub fn power_of<I>(&self, indices: I) -> u128
    where
        I: IntoIterator<Item = ValidatorIndex>,
    {
        indices
            .into_iter()
            .map(|i| self.power_at(i) as u128)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Validator> {
        self.validators.iter()
    }
}
