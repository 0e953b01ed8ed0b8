//! Memory hierarchy error definitions.
//!
//! Every error in this crate is a contract violation by the caller: an
//! address outside the simulated address space, or a hierarchy configured
//! with nothing to hold. There are no transient failures, so nothing here is
//! retried; errors carry enough context (address, tier, bound) to diagnose
//! the offending access.

use thiserror::Error;

use super::addr::Tier;

/// Errors raised by the cache, the storage tiers, and the memory manager.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// A global address at or past the end of the address space.
    #[error("address {address:#x} out of range (address space holds {limit:#x} words)")]
    AddressOutOfRange {
        /// The offending global address.
        address: u32,
        /// Total words in the address space (`primary + secondary`).
        limit: u64,
    },

    /// A tier-local offset at or past the end of a tier.
    #[error("{tier} tier offset {offset:#x} out of range (tier holds {size:#x} words)")]
    TierOutOfRange {
        /// Tier that rejected the access.
        tier: Tier,
        /// The offending tier-local offset.
        offset: u32,
        /// Number of words in the tier.
        size: usize,
    },

    /// A tier was configured with zero words.
    #[error("{tier} tier must hold at least one word")]
    ZeroSizedTier {
        /// The empty tier.
        tier: Tier,
    },

    /// The cache was configured with zero lines.
    #[error("cache capacity must be at least one line")]
    ZeroCacheCapacity,

    /// The two tiers together do not fit in a 32-bit address space.
    #[error("tiers of {primary} + {secondary} words exceed the 32-bit address space")]
    AddressSpaceOverflow {
        /// Requested primary tier size.
        primary: usize,
        /// Requested secondary tier size.
        secondary: usize,
    },
}

impl MemoryError {
    /// Returns true for the out-of-range family (global or tier-local).
    pub const fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::AddressOutOfRange { .. } | Self::TierOutOfRange { .. }
        )
    }

    /// Returns true for errors raised while sizing the hierarchy.
    pub const fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::ZeroSizedTier { .. } | Self::ZeroCacheCapacity | Self::AddressSpaceOverflow { .. }
        )
    }
}

/// Result alias for memory hierarchy operations.
pub type MemoryResult<T> = Result<T, MemoryError>;
