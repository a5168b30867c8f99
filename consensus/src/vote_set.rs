//! Vote set: the per-round aggregate of validator signatures over one Fn
//! result hash.
//!
//! A vote set is scoped to a `(chain id, fn id, nonce)` triple. It holds a
//! presence bit array with one flag per validator and the list of signed
//! votes, kept sorted by validator index. The sort order makes the encoding
//! byte-identical on every node that learned the same votes, whatever path
//! they arrived by.
//!
//! Lifecycle:
//! - **Empty**: created with no hash and no votes.
//! - **Collecting**: at least one vote, flagged power at most two thirds.
//! - **Final**: flagged power strictly above two thirds. Terminal; a final
//!   set is never merged into again and is never accepted from a peer.

use fncon_crypto::{blake2b_256_multi, verify_signature, VoteSigner};
use fncon_types::{BitArray, Nonce, ResponseHash, Signature, ValidatorIndex, ValidatorSet};
use serde::{Deserialize, Serialize};

use crate::error::{ConflictReason, ValidationError, VoteSetError};
use crate::fn_registry::{FnRegistry, FnResponse};

/// Upper bound on an encoded vote set accepted off the wire.
pub const MAX_ENCODED_VOTE_SET: usize = 1024 * 1024;

/// Domain separator for the vote subject hash.
const VOTE_DOMAIN: &[u8] = b"fncon/vote/v1";

/// One validator's vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVote {
    pub validator_index: ValidatorIndex,
    /// Validator signature over [`vote_subject`].
    pub signature: Signature,
    /// The Fn's signature over the response hash, as produced on that validator.
    pub oracle_signature: Vec<u8>,
}

/// Hash signed by a validator when voting for `hash` in a round.
pub fn vote_subject(chain_id: &str, fn_id: &str, nonce: Nonce, hash: &ResponseHash) -> [u8; 32] {
    let chain_len = (chain_id.len() as u64).to_le_bytes();
    let fn_len = (fn_id.len() as u64).to_le_bytes();
    let nonce = nonce.to_le_bytes();
    blake2b_256_multi(&[
        VOTE_DOMAIN,
        &chain_len,
        chain_id.as_bytes(),
        &fn_len,
        fn_id.as_bytes(),
        &nonce,
        hash.as_bytes(),
    ])
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSet {
    chain_id: String,
    fn_id: String,
    nonce: Nonce,
    response_hash: Option<ResponseHash>,
    votes: Vec<SignedVote>,
    bits: BitArray,
}

impl VoteSet {
    /// Create an empty vote set for one round.
    pub fn new(
        chain_id: impl Into<String>,
        fn_id: impl Into<String>,
        nonce: Nonce,
        validator_count: u32,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            fn_id: fn_id.into(),
            nonce,
            response_hash: None,
            votes: Vec::new(),
            bits: BitArray::new(validator_count),
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn fn_id(&self) -> &str {
        &self.fn_id
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn response_hash(&self) -> Option<&ResponseHash> {
        self.response_hash.as_ref()
    }

    /// Votes, ascending by validator index.
    pub fn votes(&self) -> &[SignedVote] {
        &self.votes
    }

    pub fn bits(&self) -> &BitArray {
        &self.bits
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn has_vote(&self, index: ValidatorIndex) -> bool {
        self.bits.get(index)
    }

    /// Summed voting power of the flagged validators.
    pub fn flagged_power(&self, validators: &ValidatorSet) -> u128 {
        validators.power_of(self.bits.iter_ones())
    }

    /// Flagged power is strictly greater than two thirds of the total.
    pub fn is_maj23(&self, validators: &ValidatorSet) -> bool {
        let flagged = self.flagged_power(validators);
        flagged.saturating_mul(3) > validators.total_power().saturating_mul(2)
    }

    /// Check a vote set received from a peer.
    ///
    /// Structural checks run first, then signatures, then finality: a set
    /// that already carries a two-thirds majority is rejected because peers
    /// stop gossiping once they finalize.
    pub fn validate(
        &self,
        chain_id: &str,
        validators: &ValidatorSet,
        registry: &dyn FnRegistry,
    ) -> Result<(), ValidationError> {
        if self.chain_id != chain_id {
            return Err(ValidationError::ChainMismatch {
                expected: chain_id.to_string(),
                actual: self.chain_id.clone(),
            });
        }
        if !registry.contains(&self.fn_id) {
            return Err(ValidationError::UnknownFn(self.fn_id.clone()));
        }
        if self.bits.len() != validators.size() {
            return Err(ValidationError::ValidatorCountMismatch {
                expected: validators.size(),
                actual: self.bits.len(),
            });
        }
        if !self.bits.is_well_formed() {
            return Err(ValidationError::MalformedBitArray);
        }
        let flagged = self.bits.count_ones();
        if self.votes.len() != flagged as usize {
            return Err(ValidationError::VoteCountMismatch {
                votes: self.votes.len(),
                flagged,
            });
        }
        if !self.votes.is_empty() && self.response_hash.is_none() {
            return Err(ValidationError::MissingResponseHash);
        }

        let mut previous: Option<ValidatorIndex> = None;
        for vote in &self.votes {
            let index = vote.validator_index;
            if previous.is_some_and(|p| p >= index) {
                return Err(ValidationError::UnsortedVotes);
            }
            previous = Some(index);
            if !self.bits.get(index) {
                return Err(ValidationError::UnflaggedVote(index));
            }
            if vote.oracle_signature.is_empty() || vote.signature.is_zero() {
                return Err(ValidationError::EmptySignature(index));
            }
        }

        if let Some(hash) = &self.response_hash {
            let subject = vote_subject(&self.chain_id, &self.fn_id, self.nonce, hash);
            for vote in &self.votes {
                let index = vote.validator_index;
                let Some(validator) = validators.get(index) else {
                    return Err(ValidationError::UnflaggedVote(index));
                };
                if !verify_signature(&subject, &vote.signature, &validator.public_key) {
                    return Err(ValidationError::InvalidSignature(index));
                }
            }
        }

        if self.is_maj23(validators) {
            return Err(ValidationError::AlreadyFinalized(self.nonce));
        }
        Ok(())
    }

    /// Boolean form of [`VoteSet::validate`].
    pub fn is_valid(
        &self,
        chain_id: &str,
        validators: &ValidatorSet,
        registry: &dyn FnRegistry,
    ) -> bool {
        self.validate(chain_id, validators, registry).is_ok()
    }

    /// Merge another vote set for the same round into this one.
    ///
    /// The bitmap becomes the union of both bitmaps and the other side's
    /// votes for newly set indices are inserted in index order. Returns
    /// whether the bitmap grew. On error `self` is left untouched.
    pub fn merge(&mut self, other: &VoteSet) -> Result<bool, VoteSetError> {
        self.check_same_round(other)?;
        let hash = match (self.response_hash, other.response_hash) {
            (Some(ours), Some(theirs)) if ours != theirs => {
                return Err(VoteSetError::Conflict(ConflictReason::ResponseHash));
            }
            (ours, theirs) => ours.or(theirs),
        };

        let bits = self
            .bits
            .union(&other.bits)
            .ok_or(VoteSetError::Conflict(ConflictReason::ValidatorCount))?;
        let changed = bits != self.bits;
        for vote in &other.votes {
            let index = vote.validator_index;
            if self.bits.get(index) || !bits.get(index) || self.has_vote_entry(index) {
                continue;
            }
            self.insert_sorted(vote.clone());
        }
        self.bits = bits;
        self.response_hash = hash;
        Ok(changed)
    }

    /// Sign `response` as the validator at `index` and add the vote.
    ///
    /// Establishes the response hash on an empty set. Fails without touching
    /// the set on a duplicate, an out-of-range index, an empty oracle
    /// signature or a hash different from the one already collected.
    pub fn add_vote(
        &mut self,
        response: &FnResponse,
        index: ValidatorIndex,
        signer: &dyn VoteSigner,
    ) -> Result<(), VoteSetError> {
        if index >= self.bits.len() {
            return Err(VoteSetError::InvalidIndex {
                index,
                len: self.bits.len(),
            });
        }
        if self.bits.get(index) {
            return Err(VoteSetError::DuplicateVote(index));
        }
        if let Some(existing) = &self.response_hash {
            if existing != &response.hash {
                return Err(VoteSetError::Conflict(ConflictReason::ResponseHash));
            }
        }
        if response.oracle_signature.is_empty() {
            return Err(VoteSetError::EmptyOracleSignature);
        }

        let subject = vote_subject(&self.chain_id, &self.fn_id, self.nonce, &response.hash);
        let signature = signer.sign(&subject);
        self.response_hash = Some(response.hash);
        self.insert_sorted(SignedVote {
            validator_index: index,
            signature,
            oracle_signature: response.oracle_signature.clone(),
        });
        self.bits.set(index);
        Ok(())
    }

    /// Canonical binary encoding.
    pub fn encode(&self) -> Result<Vec<u8>, VoteSetError> {
        let bytes = bincode::serialize(self).map_err(|e| VoteSetError::Encode(e.to_string()))?;
        if bytes.len() > MAX_ENCODED_VOTE_SET {
            return Err(VoteSetError::TooLarge {
                size: bytes.len(),
                max: MAX_ENCODED_VOTE_SET,
            });
        }
        Ok(bytes)
    }

    /// Decode bytes produced by [`VoteSet::encode`]. Trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self, VoteSetError> {
        if bytes.len() > MAX_ENCODED_VOTE_SET {
            return Err(VoteSetError::TooLarge {
                size: bytes.len(),
                max: MAX_ENCODED_VOTE_SET,
            });
        }
        let vote_set: VoteSet =
            bincode::deserialize(bytes).map_err(|e| VoteSetError::Decode(e.to_string()))?;
        let consumed = bincode::serialized_size(&vote_set)
            .map_err(|e| VoteSetError::Decode(e.to_string()))?;
        if consumed != bytes.len() as u64 {
            return Err(VoteSetError::Decode(format!(
                "{} trailing bytes",
                bytes.len() as u64 - consumed
            )));
        }
        Ok(vote_set)
    }

    fn check_same_round(&self, other: &VoteSet) -> Result<(), VoteSetError> {
        let reason = if self.chain_id != other.chain_id {
            ConflictReason::ChainId
        } else if self.fn_id != other.fn_id {
            ConflictReason::FnId
        } else if self.nonce != other.nonce {
            ConflictReason::Nonce
        } else if self.bits.len() != other.bits.len() {
            ConflictReason::ValidatorCount
        } else {
            return Ok(());
        };
        Err(VoteSetError::Conflict(reason))
    }

    fn has_vote_entry(&self, index: ValidatorIndex) -> bool {
        self.votes
            .binary_search_by_key(&index, |v| v.validator_index)
            .is_ok()
    }

    fn insert_sorted(&mut self, vote: SignedVote) {
        let pos = self
            .votes
            .partition_point(|v| v.validator_index < vote.validator_index);
        self.votes.insert(pos, vote);
    }
}
