//! Backing storage tiers.
//!
//! This module implements the levels of the hierarchy below the cache. It provides:
//! 1. **Interface:** The [`Storage`] trait, the word-granular read/write contract the
//!    memory manager consumes for miss fills and write-backs.
//! 2. **Store:** [`WordStore`], a fixed-size in-memory word array implementing it.
//!
//! Tiers are pure storage: they hold no policy, charge no cycles, and reject
//! tier-local offsets at or past their size.

/// Fixed-size word array tier.
pub mod store;

pub use store::WordStore;

use crate::common::{MemoryResult, Tier};

/// A level of backing storage addressed by tier-local word offsets.
///
/// Implementors must be `Send` so a manager holding boxed tiers can be shared
/// between simulation threads behind its lock.
pub trait Storage: Send {
    /// Returns which tier this storage backs (used for error context and tracing).
    fn tier(&self) -> Tier;

    /// Returns the number of words held.
    fn len(&self) -> usize;

    /// Returns true if the tier holds no words.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the word at a tier-local offset.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::TierOutOfRange`](crate::common::MemoryError::TierOutOfRange)
    /// if `offset >= self.len()`.
    fn read_word(&self, offset: u32) -> MemoryResult<u32>;

    /// Writes the word at a tier-local offset.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::TierOutOfRange`](crate::common::MemoryError::TierOutOfRange)
    /// if `offset >= self.len()`.
    fn write_word(&mut self, offset: u32, val: u32) -> MemoryResult<()>;
}
