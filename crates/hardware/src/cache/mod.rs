//! Fully associative write-back cache.
//!
//! This module implements the single cache level in front of the storage tiers.
//! It holds a bounded set of address→word lines keyed over a flat address
//! space (no sets, no ways). It models:
//! 1. **Lookup:** Pure hit/miss queries.
//! 2. **Write-back:** Writes only dirty the cached line; tiers are never touched here.
//! 3. **Eviction:** Least-recent-use by caller-supplied logical timestamp, ties
//!    broken by insertion order.
//!
//! An eviction is reported to the caller as an [`EvictedLine`]. The cache has
//! no knowledge of tiers; writing a dirty victim back is the caller's job.

/// Victim selection indexes (flat scan and recency-ordered).
pub mod policies;

use std::collections::HashMap;

use self::policies::{OrderedIndex, Recency, RecencyIndex, ScanIndex};
use crate::common::{MemoryError, MemoryResult};
use crate::config::{CacheConfig, VictimIndex};

/// A resident cache line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheLine {
    /// Global address cached by this line.
    pub address: u32,
    /// Cached word.
    pub value: u32,
    /// Set when the word was written and not yet propagated to its tier.
    pub dirty: bool,
    /// Logical timestamp of the last fill, write, or touch.
    pub last_used: u64,
    seq: u64,
}

impl CacheLine {
    /// Eviction ordering key of this line.
    #[inline(always)]
    pub const fn recency(&self) -> Recency {
        Recency {
            last_used: self.last_used,
            seq: self.seq,
        }
    }

    /// Insertion sequence number (unique per insertion, never refreshed).
    pub const fn insertion_seq(&self) -> u64 {
        self.seq
    }
}

/// A line removed from the cache to make room for an insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvictedLine {
    /// Global address the line cached.
    pub address: u32,
    /// Word held at eviction.
    pub value: u32,
    /// Whether the word must be written back to its home tier.
    pub dirty: bool,
}

impl EvictedLine {
    /// Returns true if the caller must write this line back.
    #[inline(always)]
    pub const fn needs_write_back(&self) -> bool {
        self.dirty
    }
}

impl From<CacheLine> for EvictedLine {
    fn from(line: CacheLine) -> Self {
        Self {
            address: line.address,
            value: line.value,
            dirty: line.dirty,
        }
    }
}

/// Fixed-capacity cache with dirty tracking and LRU eviction.
#[derive(Debug)]
pub struct Cache {
    lines: HashMap<u32, CacheLine>,
    capacity: usize,
    index: Box<dyn RecencyIndex>,
    next_seq: u64,
}

impl Cache {
    /// Creates an empty cache with the flat-scan victim index.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ZeroCacheCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> MemoryResult<Self> {
        Self::with_index(capacity, VictimIndex::Scan)
    }

    /// Creates an empty cache using the given victim index.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of resident lines.
    /// * `kind` - Victim index implementation.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ZeroCacheCapacity`] if `capacity` is zero.
    pub fn with_index(capacity: usize, kind: VictimIndex) -> MemoryResult<Self> {
        if capacity == 0 {
            return Err(MemoryError::ZeroCacheCapacity);
        }
        let index: Box<dyn RecencyIndex> = match kind {
            VictimIndex::Scan => Box::new(ScanIndex::new()),
            VictimIndex::Ordered => Box::new(OrderedIndex::new()),
        };
        Ok(Self {
            lines: HashMap::with_capacity(capacity),
            capacity,
            index,
            next_seq: 0,
        })
    }

    /// Creates an empty cache from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ZeroCacheCapacity`] if the configured capacity is zero.
    pub fn from_config(config: &CacheConfig) -> MemoryResult<Self> {
        Self::with_index(config.capacity, config.index)
    }

    /// Looks up an address.
    ///
    /// Pure query: recency is not refreshed (see [`Cache::touch`]).
    ///
    /// # Returns
    ///
    /// The cached word, or `None` on a miss.
    #[inline]
    pub fn get(&self, address: u32) -> Option<u32> {
        self.lines.get(&address).map(|line| line.value)
    }

    /// Refreshes the recency of a resident line without dirtying it.
    ///
    /// # Returns
    ///
    /// `true` if the line was resident.
    pub fn touch(&mut self, address: u32, timestamp: u64) -> bool {
        match self.lines.get_mut(&address) {
            Some(line) => {
                let old = line.recency();
                line.last_used = timestamp;
                self.index.refresh(address, old, line.recency());
                true
            }
            None => false,
        }
    }

    /// Inserts a clean line after a fill from a lower tier.
    ///
    /// If the address is already resident its recency is refreshed; the value
    /// is replaced only if the line is clean, so a pending write is never
    /// overwritten by stale tier data.
    ///
    /// # Arguments
    ///
    /// * `address` - Global address filled.
    /// * `value` - Word read from the tier.
    /// * `timestamp` - Logical timestamp of the access causing the fill.
    ///
    /// # Returns
    ///
    /// The evicted line if the cache was full and the address was not resident.
    pub fn put(&mut self, address: u32, value: u32, timestamp: u64) -> Option<EvictedLine> {
        if let Some(line) = self.lines.get_mut(&address) {
            let old = line.recency();
            line.last_used = timestamp;
            if !line.dirty {
                line.value = value;
            }
            self.index.refresh(address, old, line.recency());
            return None;
        }
        self.insert(address, value, false, timestamp)
    }

    /// Writes a word into the cache (write-back, write-allocate).
    ///
    /// A resident line is overwritten, marked dirty, and refreshed. An absent
    /// address is allocated as a dirty line, evicting as [`Cache::put`] does.
    ///
    /// # Returns
    ///
    /// The evicted line if the allocation displaced one.
    pub fn update(&mut self, address: u32, value: u32, timestamp: u64) -> Option<EvictedLine> {
        if let Some(line) = self.lines.get_mut(&address) {
            let old = line.recency();
            line.value = value;
            line.dirty = true;
            line.last_used = timestamp;
            self.index.refresh(address, old, line.recency());
            return None;
        }
        self.insert(address, value, true, timestamp)
    }

    /// Returns the line that inserting `address` would evict.
    ///
    /// `None` if `address` is resident or the cache has room. The answer holds
    /// until the next mutation, so a caller can write a dirty victim back
    /// before committing the insertion.
    pub fn victim_for(&self, address: u32) -> Option<EvictedLine> {
        if self.lines.contains_key(&address) || self.lines.len() < self.capacity {
            return None;
        }
        let victim = self.index.victim(&self.lines)?;
        self.lines.get(&victim).copied().map(EvictedLine::from)
    }

    /// Returns every dirty line, oldest first, without changing cache state.
    ///
    /// Pair with [`Cache::clean`] once each line has been written back.
    pub fn dirty_lines(&self) -> Vec<EvictedLine> {
        let mut dirty: Vec<CacheLine> = self
            .lines
            .values()
            .filter(|line| line.dirty)
            .copied()
            .collect();
        dirty.sort_by_key(CacheLine::recency);
        dirty.into_iter().map(EvictedLine::from).collect()
    }

    /// Clears the dirty bit of a resident line, keeping its value and recency.
    ///
    /// # Returns
    ///
    /// `true` if the line was resident and dirty.
    pub fn clean(&mut self, address: u32) -> bool {
        match self.lines.get_mut(&address) {
            Some(line) if line.dirty => {
                line.dirty = false;
                true
            }
            _ => false,
        }
    }

    /// Returns true if the address is resident.
    pub fn contains(&self, address: u32) -> bool {
        self.lines.contains_key(&address)
    }

    /// Returns a copy of the resident line for an address.
    pub fn line(&self, address: u32) -> Option<CacheLine> {
        self.lines.get(&address).copied()
    }

    /// Returns all resident lines in eviction order (next victim first).
    pub fn lines(&self) -> Vec<CacheLine> {
        let mut lines: Vec<CacheLine> = self.lines.values().copied().collect();
        lines.sort_by_key(CacheLine::recency);
        lines
    }

    /// Number of resident lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no line is resident.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of resident lines.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident dirty lines.
    pub fn dirty_count(&self) -> usize {
        self.lines.values().filter(|line| line.dirty).count()
    }

    fn insert(
        &mut self,
        address: u32,
        value: u32,
        dirty: bool,
        timestamp: u64,
    ) -> Option<EvictedLine> {
        let evicted = if self.lines.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let line = CacheLine {
            address,
            value,
            dirty,
            last_used: timestamp,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.index.insert(address, line.recency());
        let _ = self.lines.insert(address, line);
        evicted
    }

    fn evict(&mut self) -> Option<EvictedLine> {
        let victim = self.index.victim(&self.lines)?;
        let line = self.lines.remove(&victim)?;
        self.index.remove(victim, line.recency());
        Some(EvictedLine::from(line))
    }
}
