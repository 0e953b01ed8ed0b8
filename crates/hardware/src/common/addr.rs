//! Global and tier-local address types.
//!
//! The simulated address space is a single contiguous range covering the
//! primary store followed by the secondary store. This module provides:
//! 1. **Tier identity:** The [`Tier`] enum naming each level of backing storage.
//! 2. **Routed addresses:** [`TierAddr`], a global address resolved to its home tier
//!    and the word offset within that tier.
//! 3. **Routing:** The boundary rule shared by reads, writes, and write-back.

use std::fmt;

/// A level of backing storage below the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Fast store occupying global addresses `[0, boundary)`.
    Primary,
    /// Slow store occupying global addresses `[boundary, boundary + secondary_size)`.
    Secondary,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// A global address resolved to its home tier.
///
/// `offset` is local to `tier`: for the secondary tier it is
/// `global - boundary`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TierAddr {
    /// Tier that owns the address.
    pub tier: Tier,
    /// Word offset within the tier.
    pub offset: u32,
}

impl TierAddr {
    /// Routes a global address using the tier boundary.
    ///
    /// Addresses strictly below `boundary` belong to the primary tier at the
    /// same offset; everything else belongs to the secondary tier at
    /// `address - boundary`. Bounds against the end of the address space are
    /// checked by the caller.
    ///
    /// # Arguments
    ///
    /// * `address` - Global address.
    /// * `boundary` - First global address of the secondary tier.
    #[inline(always)]
    pub const fn route(address: u32, boundary: u32) -> Self {
        if address < boundary {
            Self {
                tier: Tier::Primary,
                offset: address,
            }
        } else {
            Self {
                tier: Tier::Secondary,
                offset: address - boundary,
            }
        }
    }

    /// Converts back to the global address.
    #[inline(always)]
    pub const fn global(&self, boundary: u32) -> u32 {
        match self.tier {
            Tier::Primary => self.offset,
            Tier::Secondary => self.offset + boundary,
        }
    }
}

impl fmt::Display for TierAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:#x}]", self.tier, self.offset)
    }
}
