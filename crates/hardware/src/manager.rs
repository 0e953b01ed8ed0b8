//! Tiered memory manager.
//!
//! Single entry point for simulated memory traffic. The manager owns:
//! 1. **Routing:** The tier boundary splitting the global address space into
//!    primary `[0, boundary)` and secondary `[boundary, limit)`.
//! 2. **Ordering:** The logical timestamp stamped on every access.
//! 3. **Wiring:** The cache and both tiers, including write-back of dirty victims.
//! 4. **Accounting:** Charging each access to the issuing process.
//!
//! # Concurrency
//!
//! The timestamp, the cache, and both tiers sit behind one `parking_lot::Mutex`.
//! Eviction compares recency across every resident line, so all of them must
//! be observed under the same exclusion point; a miss fetches from its tier and
//! fills the cache without releasing the lock. Process counters are atomics and
//! are bumped outside the critical section where the order allows.
//!
//! # Write-back cost
//!
//! Writing a dirty victim back to its tier is a consequence of the eviction,
//! not of the access that triggered it, so it is charged to no process. It is
//! counted in [`HierarchyStats::write_backs`] instead.

use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::cache::{Cache, CacheLine, EvictedLine};
use crate::common::{
    AccessType, INITIAL_TIMESTAMP, MemoryError, MemoryResult, ServicedBy, Tier, TierAddr,
};
use crate::config::{CacheConfig, Config, validate_tiers};
use crate::stats::{HierarchyStats, Process};
use crate::storage::{Storage, WordStore};

/// State guarded by the manager's lock.
struct Hierarchy {
    timestamp: u64,
    cache: Cache,
    primary: Box<dyn Storage>,
    secondary: Box<dyn Storage>,
}

impl Hierarchy {
    #[inline(always)]
    fn tier(&self, tier: Tier) -> &dyn Storage {
        match tier {
            Tier::Primary => self.primary.as_ref(),
            Tier::Secondary => self.secondary.as_ref(),
        }
    }

    #[inline(always)]
    fn tier_mut(&mut self, tier: Tier) -> &mut dyn Storage {
        match tier {
            Tier::Primary => self.primary.as_mut(),
            Tier::Secondary => self.secondary.as_mut(),
        }
    }
}

/// Cache-fronted two-tier memory.
pub struct MemoryManager {
    boundary: u32,
    limit: u64,
    touch_on_read_hit: bool,
    state: Mutex<Hierarchy>,
    stats: HierarchyStats,
}

impl MemoryManager {
    /// Creates a manager with zero-filled tiers and the default cache.
    ///
    /// # Arguments
    ///
    /// * `primary_size` - Words in the primary tier; also the tier boundary.
    /// * `secondary_size` - Words in the secondary tier.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ZeroSizedTier`] or [`MemoryError::AddressSpaceOverflow`].
    pub fn new(primary_size: usize, secondary_size: usize) -> MemoryResult<Self> {
        Self::with_cache(primary_size, secondary_size, &CacheConfig::default())
    }

    /// Creates a manager with zero-filled tiers and the given cache.
    ///
    /// # Errors
    ///
    /// As [`MemoryManager::new`], plus [`MemoryError::ZeroCacheCapacity`].
    pub fn with_cache(
        primary_size: usize,
        secondary_size: usize,
        cache: &CacheConfig,
    ) -> MemoryResult<Self> {
        validate_tiers(primary_size, secondary_size)?;
        Self::with_storage(
            Box::new(WordStore::new(Tier::Primary, primary_size)?),
            Box::new(WordStore::new(Tier::Secondary, secondary_size)?),
            cache,
        )
    }

    /// Creates a manager from a full configuration.
    ///
    /// # Errors
    ///
    /// As [`MemoryManager::with_cache`].
    pub fn from_config(config: &Config) -> MemoryResult<Self> {
        Self::with_cache(
            config.memory.primary_size,
            config.memory.secondary_size,
            &config.cache,
        )
    }

    /// Creates a manager over caller-provided tiers.
    ///
    /// The boundary is the primary tier's length. Used to start from
    /// pre-loaded storage or to observe tier traffic.
    ///
    /// # Errors
    ///
    /// As [`MemoryManager::with_cache`], judged on the tiers' reported lengths.
    pub fn with_storage(
        primary: Box<dyn Storage>,
        secondary: Box<dyn Storage>,
        config: &CacheConfig,
    ) -> MemoryResult<Self> {
        validate_tiers(primary.len(), secondary.len())?;
        let cache = Cache::from_config(config)?;

        let boundary = primary.len() as u32;
        let limit = primary.len() as u64 + secondary.len() as u64;
        info!(
            primary = primary.len(),
            secondary = secondary.len(),
            capacity = cache.capacity(),
            index = ?config.index,
            "memory hierarchy initialized"
        );

        Ok(Self {
            boundary,
            limit,
            touch_on_read_hit: config.touch_on_read_hit,
            state: Mutex::new(Hierarchy {
                timestamp: INITIAL_TIMESTAMP,
                cache,
                primary,
                secondary,
            }),
            stats: HierarchyStats::default(),
        })
    }

    /// Validates a global address and resolves its home tier.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::AddressOutOfRange`] if `address` is past the
    /// end of the secondary tier.
    #[inline]
    pub fn route(&self, address: u32) -> MemoryResult<TierAddr> {
        if u64::from(address) >= self.limit {
            return Err(MemoryError::AddressOutOfRange {
                address,
                limit: self.limit,
            });
        }
        Ok(TierAddr::route(address, self.boundary))
    }

    /// Reads a word on behalf of a process.
    ///
    /// A hit is charged at the cache weight. A miss is charged at the weight
    /// of the tier it is fetched from, and the word is filled into the cache.
    /// If the fill needs room and the victim is dirty, the victim is written
    /// back to its home tier before the cache is changed.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::AddressOutOfRange`] if the address is invalid.
    /// Tier errors from the fetch or the write-back are propagated. A failed
    /// read leaves the cache, the timestamp, and the process counters as they
    /// were.
    pub fn read<P: Process + ?Sized>(&self, address: u32, process: &P) -> MemoryResult<u32> {
        let home = self.route(address)?;

        let mut state = self.state.lock();
        let now = state.timestamp + 1;

        let (value, by) = if let Some(value) = state.cache.get(address) {
            if self.touch_on_read_hit {
                let _ = state.cache.touch(address, now);
            }
            (value, ServicedBy::Cache)
        } else {
            let value = state.tier(home.tier).read_word(home.offset)?;
            let victim = self.make_room(&mut state, address)?;
            let evicted = state.cache.put(address, value, now);
            debug_assert_eq!(evicted.map(|e| e.address), victim.map(|v| v.address));
            HierarchyStats::bump(&self.stats.fills);
            self.count_eviction(victim);
            (value, ServicedBy::from(home.tier))
        };
        state.timestamp = now;
        drop(state);

        let counters = process.counters();
        counters.record_access(AccessType::Read);
        counters.record_service(by, process.weights());
        trace!(pid = process.pid(), address, now, value, %home, ?by, "read");
        Ok(value)
    }

    /// Writes a word on behalf of a process.
    ///
    /// The word lands in the cache only (write-back, write-allocate) and is
    /// charged at the cache weight. If allocating the line needs room and the
    /// victim is dirty, the victim is written back to its home tier before the
    /// cache is changed.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::AddressOutOfRange`] if the address is invalid.
    /// Tier errors from the write-back are propagated; the write is then not
    /// applied, and the cache, the timestamp, and the process counters are
    /// left as they were.
    pub fn write<P: Process + ?Sized>(
        &self,
        address: u32,
        data: u32,
        process: &P,
    ) -> MemoryResult<()> {
        let _ = self.route(address)?;

        let mut state = self.state.lock();
        let now = state.timestamp + 1;
        let victim = self.make_room(&mut state, address)?;
        let evicted = state.cache.update(address, data, now);
        debug_assert_eq!(evicted.map(|e| e.address), victim.map(|v| v.address));
        self.count_eviction(victim);
        state.timestamp = now;
        drop(state);

        let counters = process.counters();
        counters.record_access(AccessType::Write);
        counters.record_service(ServicedBy::Cache, process.weights());
        trace!(pid = process.pid(), address, now, data, "write");
        Ok(())
    }

    /// Writes every dirty line back to its home tier.
    ///
    /// Lines stay resident and become clean. Not charged to any process and
    /// does not advance the timestamp.
    ///
    /// # Returns
    ///
    /// The number of lines written back.
    ///
    /// # Errors
    ///
    /// Propagates the first tier error; lines already written stay clean, the
    /// rest stay dirty.
    pub fn flush(&self) -> MemoryResult<usize> {
        let mut state = self.state.lock();
        let dirty = state.cache.dirty_lines();
        for line in &dirty {
            self.write_back(&mut state, line.address, line.value)?;
            let _ = state.cache.clean(line.address);
        }
        HierarchyStats::bump(&self.stats.flushes);
        debug!(written = dirty.len(), "flush");
        Ok(dirty.len())
    }

    /// Returns the current value of a word without side effects.
    ///
    /// Reads the cached copy if resident, otherwise the home tier. Does not
    /// advance the timestamp, fill the cache, or charge anyone.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::AddressOutOfRange`] for an invalid address.
    pub fn peek(&self, address: u32) -> MemoryResult<u32> {
        let home = self.route(address)?;
        let state = self.state.lock();
        match state.cache.get(address) {
            Some(value) => Ok(value),
            None => state.tier(home.tier).read_word(home.offset),
        }
    }

    /// Returns the word currently held by the home tier, bypassing the cache.
    ///
    /// Differs from [`MemoryManager::peek`] while the address is dirty in the cache.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::AddressOutOfRange`] for an invalid address.
    pub fn backing_word(&self, address: u32) -> MemoryResult<u32> {
        let home = self.route(address)?;
        self.state.lock().tier(home.tier).read_word(home.offset)
    }

    /// Returns the resident cache lines, next victim first.
    pub fn resident_lines(&self) -> Vec<CacheLine> {
        self.state.lock().cache.lines()
    }

    /// Number of resident dirty lines.
    pub fn dirty_lines(&self) -> usize {
        self.state.lock().cache.dirty_count()
    }

    /// Current logical timestamp (number of accesses issued so far).
    pub fn timestamp(&self) -> u64 {
        self.state.lock().timestamp
    }

    /// First global address of the secondary tier.
    pub const fn boundary(&self) -> u32 {
        self.boundary
    }

    /// Total number of addressable words.
    pub const fn address_space(&self) -> u64 {
        self.limit
    }

    /// Hierarchy-wide counters.
    pub const fn stats(&self) -> &HierarchyStats {
        &self.stats
    }

    /// Consumes the manager and returns its tiers as `(primary, secondary)`.
    ///
    /// Dirty lines are not written back; call [`MemoryManager::flush`] first.
    pub fn into_tiers(self) -> (Box<dyn Storage>, Box<dyn Storage>) {
        let state = self.state.into_inner();
        (state.primary, state.secondary)
    }

    /// Writes back the line that inserting `address` would evict, if dirty.
    ///
    /// The victim stays resident (now clean) until the insertion evicts it, so
    /// a failed write-back leaves the cache unchanged.
    fn make_room(&self, state: &mut Hierarchy, address: u32) -> MemoryResult<Option<EvictedLine>> {
        let Some(victim) = state.cache.victim_for(address) else {
            return Ok(None);
        };
        if victim.needs_write_back() {
            self.write_back(state, victim.address, victim.value)?;
            let _ = state.cache.clean(victim.address);
        }
        Ok(Some(victim))
    }

    fn count_eviction(&self, victim: Option<EvictedLine>) {
        let Some(victim) = victim else { return };
        HierarchyStats::bump(&self.stats.evictions);
        if !victim.needs_write_back() {
            HierarchyStats::bump(&self.stats.clean_evictions);
            trace!(address = victim.address, "clean eviction");
        }
    }

    fn write_back(&self, state: &mut Hierarchy, address: u32, value: u32) -> MemoryResult<()> {
        let home = TierAddr::route(address, self.boundary);
        state.tier_mut(home.tier).write_word(home.offset, value)?;
        HierarchyStats::bump(&self.stats.write_backs);
        debug!(address, value, %home, "write-back");
        Ok(())
    }
}

impl fmt::Debug for MemoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryManager")
            .field("boundary", &self.boundary)
            .field("limit", &self.limit)
            .field("touch_on_read_hit", &self.touch_on_read_hit)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}
