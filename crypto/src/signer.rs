//! Local signing capability used when this node casts a vote.

use fncon_types::{KeyPair, PrivateKey, PublicKey, Signature, ValidatorAddress};

use crate::keys::keypair_from_private;
use crate::sign::sign_message;

/// Signs vote subjects on behalf of the local validator.
///
/// The private key never leaves the implementation; callers only see the
/// public half and the produced signatures.
pub trait VoteSigner: Send + Sync {
    fn public_key(&self) -> PublicKey;

    fn address(&self) -> ValidatorAddress {
        ValidatorAddress::from_public_key(&self.public_key())
    }

    fn sign(&self, message: &[u8]) -> Signature;
}

/// In-process Ed25519 signer.
pub struct Ed25519Signer {
    keypair: KeyPair,
}

impl Ed25519Signer {
    pub fn new(private: PrivateKey) -> Self {
        Self {
            keypair: keypair_from_private(private),
        }
    }

    pub fn from_keypair(keypair: KeyPair) -> Self {
        Self { keypair }
    }
}

impl VoteSigner for Ed25519Signer {
    fn public_key(&self) -> PublicKey {
        self.keypair.public.clone()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        sign_message(message, &self.keypair.private)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::verify_signature;

    #[test]
    fn signer_signatures_verify_under_its_key() {
        let signer = Ed25519Signer::new(PrivateKey([5u8; 32]));
        let sig = signer.sign(b"subject");
        assert!(verify_signature(b"subject", &sig, &signer.public_key()));
    }

    #[test]
    fn address_matches_public_key() {
        let signer = Ed25519Signer::new(PrivateKey([5u8; 32]));
        assert_eq!(
            signer.address(),
            ValidatorAddress::from_public_key(&signer.public_key())
        );
    }
}
