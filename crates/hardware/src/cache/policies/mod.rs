//! Victim selection indexes.
//!
//! The cache evicts the resident line with the oldest [`Recency`]: the smallest
//! `last_used` timestamp, ties broken by earliest insertion. These indexes
//! implement that single rule with different cost profiles.
//!
//! # Indexes
//!
//! - `Scan`: no bookkeeping; scans every resident line on eviction.
//! - `Ordered`: keeps lines sorted by recency; eviction takes the first entry.

/// Recency-ordered index backed by a `BTreeMap`.
pub mod ordered;

/// Flat-scan index.
pub mod scan;

pub use ordered::OrderedIndex;
pub use scan::ScanIndex;

use std::collections::HashMap;
use std::fmt;

use super::CacheLine;

/// Ordering key for eviction.
///
/// Compares by `last_used`, then by `seq` (insertion order), so the minimum
/// is the least recently used line and, among equal timestamps, the one
/// inserted first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Recency {
    /// Logical timestamp of the last fill, write, or touch.
    pub last_used: u64,
    /// Insertion sequence number, fixed for the lifetime of the line.
    pub seq: u64,
}

/// Trait for victim selection indexes.
///
/// The cache reports every change to a line's recency; the index answers
/// which resident address to evict. Implementations must agree on the
/// victim: the line with the minimum [`Recency`].
pub trait RecencyIndex: fmt::Debug + Send + Sync {
    /// Records a newly inserted line.
    fn insert(&mut self, address: u32, at: Recency);

    /// Records that a resident line moved from `old` to `new`.
    fn refresh(&mut self, address: u32, old: Recency, new: Recency);

    /// Records that a line left the cache.
    fn remove(&mut self, address: u32, at: Recency);

    /// Selects the address to evict, or `None` if no line is resident.
    ///
    /// # Arguments
    ///
    /// * `lines` - The cache's resident lines, keyed by address.
    fn victim(&self, lines: &HashMap<u32, CacheLine>) -> Option<u32>;
}
