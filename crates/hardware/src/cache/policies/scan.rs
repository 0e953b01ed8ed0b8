//! Flat-scan victim selection.
//!
//! Keeps no state of its own. Eviction walks every resident line and takes the
//! minimum recency.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `insert()`, `refresh()`, `remove()`: O(1)
//!   - `victim()`: O(N) where N is the cache capacity
//! - **Space Complexity:** O(1)
//! - **Best Case:** Small caches, where the scan fits in a few cache lines of the host.

use std::collections::HashMap;

use super::{Recency, RecencyIndex};
use crate::cache::CacheLine;

/// Flat-scan index state (none).
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanIndex;

impl ScanIndex {
    /// Creates a new scan index.
    pub const fn new() -> Self {
        Self
    }
}

impl RecencyIndex for ScanIndex {
    fn insert(&mut self, _address: u32, _at: Recency) {}

    fn refresh(&mut self, _address: u32, _old: Recency, _new: Recency) {}

    fn remove(&mut self, _address: u32, _at: Recency) {}

    fn victim(&self, lines: &HashMap<u32, CacheLine>) -> Option<u32> {
        lines
            .values()
            .min_by_key(|line| line.recency())
            .map(|line| line.address)
    }
}
