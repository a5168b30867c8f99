//! Result hash produced by an Fn for one round.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hash of an Fn's execution result.
///
/// Every signature in one vote set attests to the same `ResponseHash`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResponseHash([u8; 32]);

impl ResponseHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl Default for ResponseHash {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[u8; 32]> for ResponseHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for ResponseHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResponseHash(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for ResponseHash {
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
    fn zero_hash_is_default() {
        assert!(ResponseHash::default().is_zero());
        assert!(!ResponseHash::new([1u8; 32]).is_zero());
    }

    #[test]
    fn display_is_full_hex() {
        let hash = ResponseHash::new([0xab; 32]);
        assert_eq!(hash.to_string(), "ab".repeat(32));
    }

    #[test]
    fn debug_is_abbreviated() {
        let hash = ResponseHash::new([0x01; 32]);
        assert_eq!(format!("{hash:?}"), "ResponseHash(01010101\u{2026})");
    }
}
