//! Common types shared across the memory hierarchy.
//!
//! This module provides:
//! 1. **Address Types:** Tier identity and routed tier-local addresses.
//! 2. **Constants:** Address-space and timestamp constants.
//! 3. **Memory Access:** Classification of accesses for accounting and tracing.
//! 4. **Error Handling:** The crate-wide error type.

/// Tier and routed address definitions.
pub mod addr;

/// Common constants.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{Tier, TierAddr};
pub use constants::{ADDRESS_SPACE_WORDS, INITIAL_TIMESTAMP};
pub use data::{AccessType, ServicedBy};
pub use error::{MemoryError, MemoryResult};
