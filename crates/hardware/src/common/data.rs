//! Memory access classification.
//!
//! These types are used for the following:
//! 1. **Accounting:** Deciding which per-process counter and cost weight an access charges.
//! 2. **Tracing:** Tagging access events in structured logs.

use super::addr::Tier;

/// Direction of a memory access issued by a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Load of a word into the process.
    Read,
    /// Store of a word from the process.
    Write,
}

/// The level of the hierarchy that satisfied an access.
///
/// Writes always land in the cache, so they are always `Cache`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServicedBy {
    /// The word was resident in the cache.
    Cache,
    /// The word was fetched from the primary tier on a miss.
    Primary,
    /// The word was fetched from the secondary tier on a miss.
    Secondary,
}

impl From<Tier> for ServicedBy {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Primary => Self::Primary,
            Tier::Secondary => Self::Secondary,
        }
    }
}
