//! Global constants.

/// Number of addressable words in the 32-bit global address space.
pub const ADDRESS_SPACE_WORDS: u64 = 1 << 32;

/// Logical timestamp before any access has been issued.
pub const INITIAL_TIMESTAMP: u64 = 0;
