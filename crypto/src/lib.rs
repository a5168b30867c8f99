//! Cryptographic primitives for Fn-result consensus.
//!
//! - **Ed25519** for vote signing and signature verification
//! - **Blake2b** for hashing vote subjects
//! - [`VoteSigner`], the local signing capability handed to the vote-set engine

pub mod hash;
pub mod keys;
pub mod sign;
pub mod signer;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
pub use signer::{Ed25519Signer, VoteSigner};
