//! Fixed-length presence bitmap, one flag per validator index.

use serde::{Deserialize, Serialize};

const WORD_BITS: u32 = 64;

/// A fixed-length bit array backed by 64-bit words.
///
/// The length is fixed at construction. Bits past `len` in the last word are
/// always zero for arrays built through this API; arrays decoded from the wire
/// are checked with [`BitArray::is_well_formed`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitArray {
    len: u32,
    words: Vec<u64>,
}

impl BitArray {
    /// Create an all-clear array of `len` bits.
    pub fn new(len: u32) -> Self {
        Self {
            len,
            words: vec![0; words_for(len)],
        }
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `index`. Out-of-range reads return `false`.
    pub fn get(&self, index: u32) -> bool {
        if index >= self.len {
            return false;
        }
        let (word, bit) = position(index);
        self.words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    /// Set bit `index`. Returns `false` if the index is out of range.
    pub fn set(&mut self, index: u32) -> bool {
        if index >= self.len {
            return false;
        }
        let (word, bit) = position(index);
        match self.words.get_mut(word) {
            Some(w) => {
                *w |= 1 << bit;
                true
            }
            None => false,
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Bitwise OR of two arrays of the same length.
    ///
    /// Returns `None` when the lengths differ.
    pub fn union(&self, other: &BitArray) -> Option<BitArray> {
        if self.len != other.len || self.words.len() != other.words.len() {
            return None;
        }
        let words = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| a | b)
            .collect();
        Some(BitArray {
            len: self.len,
            words,
        })
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len).filter(move |i| self.get(*i))
    }

    /// Word count matches `len` and no bit past `len` is set.
    pub fn is_well_formed(&self) -> bool {
        if self.words.len() != words_for(self.len) {
            return false;
        }
        let tail = self.len % WORD_BITS;
        match self.words.last() {
            Some(last) if tail != 0 => last >> tail == 0,
            _ => true,
        }
    }
}

fn words_for(len: u32) -> usize {
    len.div_ceil(WORD_BITS) as usize
}

fn position(index: u32) -> (usize, u32) {
    ((index / WORD_BITS) as usize, index % WORD_BITS)
}
