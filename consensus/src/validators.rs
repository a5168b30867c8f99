//! Source of the current validator set.
//!
//! Computing the set from chain state is the host's job; the vote-set
//! machinery only needs the ordering and the voting power.

use std::sync::RwLock;

use fncon_types::ValidatorSet;

use crate::error::ProviderError;

pub trait ValidatorSetProvider: Send + Sync {
    fn current_validators(&self) -> Result<ValidatorSet, ProviderError>;
}

/// A validator set fixed at construction, replaceable by the host.
pub struct StaticValidatorSet {
    set: RwLock<ValidatorSet>,
}

impl StaticValidatorSet {
    pub fn new(set: ValidatorSet) -> Self {
        Self {
            set: RwLock::new(set),
        }
    }

    /// Swap in a new set (e.g. at an epoch boundary).
    pub fn replace(&self, set: ValidatorSet) {
        *self.set.write().unwrap_or_else(|e| e.into_inner()) = set;
    }
}

impl ValidatorSetProvider for StaticValidatorSet {
    fn current_validators(&self) -> Result<ValidatorSet, ProviderError> {
        Ok(self.set.read().unwrap_or_else(|e| e.into_inner()).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fncon_types::{PublicKey, Validator};

    #[test]
    fn replace_is_visible() {
        let one = ValidatorSet::new(vec![Validator::new(PublicKey([1; 32]), 1)]).unwrap();
        let two = ValidatorSet::new(vec![
            Validator::new(PublicKey([1; 32]), 1),
            Validator::new(PublicKey([2; 32]), 1),
        ])
        .unwrap();
        let provider = StaticValidatorSet::new(one);
        assert_eq!(provider.current_validators().unwrap().len(), 1);
        provider.replace(two);
        assert_eq!(provider.current_validators().unwrap().len(), 2);
    }
}
