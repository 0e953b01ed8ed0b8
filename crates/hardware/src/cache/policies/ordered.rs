//! Recency-ordered victim selection.
//!
//! Maintains a `BTreeMap` from [`Recency`] to address. Because `seq` is unique
//! per insertion, keys never collide, and the first key is always the victim.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `insert()`, `refresh()`, `remove()`: O(log N)
//!   - `victim()`: O(log N)
//! - **Space Complexity:** O(N)
//! - **Best Case:** Large caches where a full scan per eviction dominates.

use std::collections::{BTreeMap, HashMap};

use super::{Recency, RecencyIndex};
use crate::cache::CacheLine;

/// Ordered index state.
#[derive(Clone, Debug, Default)]
pub struct OrderedIndex {
    order: BTreeMap<Recency, u32>,
}

impl OrderedIndex {
    /// Creates an empty ordered index.
    pub const fn new() -> Self {
        Self {
            order: BTreeMap::new(),
        }
    }

    /// Number of tracked lines.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no lines are tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl RecencyIndex for OrderedIndex {
    fn insert(&mut self, address: u32, at: Recency) {
        let _ = self.order.insert(at, address);
    }

    fn refresh(&mut self, address: u32, old: Recency, new: Recency) {
        let _ = self.order.remove(&old);
        let _ = self.order.insert(new, address);
    }

    fn remove(&mut self, _address: u32, at: Recency) {
        let _ = self.order.remove(&at);
    }

    fn victim(&self, _lines: &HashMap<u32, CacheLine>) -> Option<u32> {
        self.order.first_key_value().map(|(_, &address)| address)
    }
}
