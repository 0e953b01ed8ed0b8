//! In-memory word store.
//!
//! A `Vec<u32>` sized once at construction. Every access is bounds-checked
//! and reported as an error rather than a panic, so an invalid offset can be
//! traced back to the access that produced it.

use super::Storage;
use crate::common::{MemoryError, MemoryResult, Tier};

/// Fixed-size word array backing one tier.
#[derive(Clone, Debug)]
pub struct WordStore {
    tier: Tier,
    words: Vec<u32>,
}

impl WordStore {
    /// Creates a zero-filled store of `size` words.
    ///
    /// # Arguments
    ///
    /// * `tier` - Tier this store backs.
    /// * `size` - Number of words.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ZeroSizedTier`] if `size` is zero.
    pub fn new(tier: Tier, size: usize) -> MemoryResult<Self> {
        Self::from_words(tier, vec![0; size])
    }

    /// Creates a store holding `words` as its initial contents.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ZeroSizedTier`] if `words` is empty.
    pub fn from_words(tier: Tier, words: Vec<u32>) -> MemoryResult<Self> {
        if words.is_empty() {
            return Err(MemoryError::ZeroSizedTier { tier });
        }
        Ok(Self { tier, words })
    }

    /// Copies `data` into the store starting at `offset`.
    ///
    /// Used to seed a tier before it is handed to a manager.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::TierOutOfRange`] naming the first offset past the
    /// end of the store if `data` does not fit; nothing is written in that case.
    pub fn load(&mut self, offset: u32, data: &[u32]) -> MemoryResult<()> {
        let start = offset as usize;
        let end = start + data.len();
        if end > self.words.len() {
            return Err(MemoryError::TierOutOfRange {
                tier: self.tier,
                offset: (self.words.len() as u32).max(offset),
                size: self.words.len(),
            });
        }
        self.words[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Returns the raw contents.
    pub fn as_slice(&self) -> &[u32] {
        &self.words
    }

    #[inline(always)]
    fn index(&self, offset: u32) -> MemoryResult<usize> {
        let idx = offset as usize;
        if idx < self.words.len() {
            Ok(idx)
        } else {
            Err(MemoryError::TierOutOfRange {
                tier: self.tier,
                offset,
                size: self.words.len(),
            })
        }
    }
}

impl Storage for WordStore {
    fn tier(&self) -> Tier {
        self.tier
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn read_word(&self, offset: u32) -> MemoryResult<u32> {
        let idx = self.index(offset)?;
        Ok(self.words[idx])
    }

    fn write_word(&mut self, offset: u32, val: u32) -> MemoryResult<()> {
        let idx = self.index(offset)?;
        self.words[idx] = val;
        Ok(())
    }
}
