//! Deterministic validator sets with their signing keys.

use std::sync::Arc;

use fncon_consensus::StaticValidatorSet;
use fncon_crypto::{keypair_from_seed, Ed25519Signer, VoteSigner};
use fncon_types::{Validator, ValidatorSet};

/// A validator set whose keys are derived from fixed seeds.
///
/// Validator `i` uses seed `[i + 1; 32]`, so every test that builds the same
/// powers gets the same keys in the same order.
pub struct TestValidators {
    set: ValidatorSet,
}

fn seed(index: usize) -> [u8; 32] {
    [index as u8 + 1; 32]
}

impl TestValidators {
    /// `count` validators with voting power 1 each.
    pub fn equal(count: usize) -> Self {
        Self::with_powers(&vec![1; count])
    }

    pub fn with_powers(powers: &[u64]) -> Self {
        assert!(
            !powers.is_empty() && powers.len() < 255,
            "between 1 and 254 test validators"
        );
        let validators = powers
            .iter()
            .enumerate()
            .map(|(i, power)| Validator::new(keypair_from_seed(&seed(i)).public, *power))
            .collect();
        let set = ValidatorSet::new(validators).expect("seeded keys are distinct");
        Self { set }
    }

    pub fn set(&self) -> &ValidatorSet {
        &self.set
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Signer holding validator `index`'s key.
    pub fn signer(&self, index: usize) -> Arc<dyn VoteSigner> {
        Arc::new(Ed25519Signer::from_keypair(keypair_from_seed(&seed(index))))
    }

    /// A provider serving this set.
    pub fn provider(&self) -> Arc<StaticValidatorSet> {
        Arc::new(StaticValidatorSet::new(self.set.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signer_matches_validator_order() {
        let vals = TestValidators::equal(4);
        assert_eq!(vals.len(), 4);
        for i in 0..4 {
            let address = vals.signer(i).address();
            assert_eq!(vals.set().index_of(&address), Some(i as u32));
        }
    }

    #[test]
    fn powers_are_applied() {
        let vals = TestValidators::with_powers(&[5, 1]);
        assert_eq!(vals.set().total_power(), 6);
    }
}
