//! Validator address derived from the validator's public key.

use blake2::digest::consts::U20;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keys::PublicKey;
use crate::TypesError;

type Blake2b160 = Blake2b<U20>;

/// A 20-byte validator address: the Blake2b-160 digest of the public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidatorAddress([u8; 20]);

impl ValidatorAddress {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive the address of a validator from its public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let digest = Blake2b160::digest(public_key.as_bytes());
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest);
        Self(out)
    }

    /// Parse a 40-character lowercase or uppercase hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        if s.len() != 40 || !s.is_ascii() {
            return Err(TypesError::InvalidAddress(s.to_string()));
        }
        let mut out = [0u8; 20];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|_| TypesError::InvalidAddress(s.to_string()))?;
        }
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorAddress({self})")
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let pk = PublicKey([7u8; 32]);
        assert_eq!(
            ValidatorAddress::from_public_key(&pk),
            ValidatorAddress::from_public_key(&pk)
        );
        assert_ne!(
            ValidatorAddress::from_public_key(&pk),
            ValidatorAddress::from_public_key(&PublicKey([8u8; 32]))
        );
    }

    #[test]
    fn hex_roundtrip() {
        let addr = ValidatorAddress::from_public_key(&PublicKey([3u8; 32]));
        let parsed = ValidatorAddress::from_hex(&addr.to_string()).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn bad_hex_rejected() {
        assert!(ValidatorAddress::from_hex("zz").is_err());
        assert!(ValidatorAddress::from_hex(&"g".repeat(40)).is_err());
    }
}
