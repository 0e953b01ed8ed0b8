//! Access accounting and reporting.
//!
//! This module tracks what every simulated memory access cost. It provides:
//! 1. **Weights:** Per-process cycle costs for cache, primary, and secondary service.
//! 2. **Counters:** Lock-free per-process counters mutated by the memory manager.
//! 3. **Process interface:** The [`Process`] trait the manager charges accesses to.
//! 4. **Hierarchy counters:** Fills, evictions, and write-backs, which belong to no process.
//! 5. **Reporting:** Plain snapshots with derived metrics, printable or serializable.
//!
//! Counters are independently additive. Each is updated with a relaxed atomic
//! add, and a snapshot reads them one at a time, so a snapshot taken while
//! accesses are in flight may mix fields from different instants.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::common::{AccessType, ServicedBy};
use crate::config::defaults;

/// Cycle cost charged for each level of the hierarchy.
///
/// Owned by the process and read-only to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CostWeights {
    /// Cycles for an access satisfied by the cache (and for every write)
    #[serde(default = "CostWeights::default_cache")]
    pub cache: u64,
    /// Cycles for a read miss satisfied by the primary tier
    #[serde(default = "CostWeights::default_primary")]
    pub primary: u64,
    /// Cycles for a read miss satisfied by the secondary tier
    #[serde(default = "CostWeights::default_secondary")]
    pub secondary: u64,
}

impl CostWeights {
    /// Creates a weight set.
    pub const fn new(cache: u64, primary: u64, secondary: u64) -> Self {
        Self {
            cache,
            primary,
            secondary,
        }
    }

    /// Cycles charged when an access is serviced by `by`.
    #[inline(always)]
    pub const fn cost(&self, by: ServicedBy) -> u64 {
        match by {
            ServicedBy::Cache => self.cache,
            ServicedBy::Primary => self.primary,
            ServicedBy::Secondary => self.secondary,
        }
    }

    fn default_cache() -> u64 {
        defaults::CACHE_COST
    }

    fn default_primary() -> u64 {
        defaults::PRIMARY_COST
    }

    fn default_secondary() -> u64 {
        defaults::SECONDARY_COST
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        Self::new(
            defaults::CACHE_COST,
            defaults::PRIMARY_COST,
            defaults::SECONDARY_COST,
        )
    }
}

/// Per-process memory access counters.
///
/// Safe to share between threads; every field is updated independently.
#[derive(Debug, Default)]
pub struct AccessCounters {
    /// Reads plus writes.
    pub mem_accesses_total: AtomicU64,
    /// Reads issued.
    pub mem_reads: AtomicU64,
    /// Writes issued.
    pub mem_writes: AtomicU64,
    /// Accesses serviced by the cache (read hits and all writes).
    pub cache_mem_accesses: AtomicU64,
    /// Read misses serviced by the primary tier.
    pub primary_mem_accesses: AtomicU64,
    /// Read misses serviced by the secondary tier.
    pub secondary_mem_accesses: AtomicU64,
    /// Accumulated access cost in cycles.
    pub memory_cycles: AtomicU64,
}

impl AccessCounters {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an issued access.
    #[inline]
    pub fn record_access(&self, kind: AccessType) {
        let _ = self.mem_accesses_total.fetch_add(1, Ordering::Relaxed);
        match kind {
            AccessType::Read => {
                let _ = self.mem_reads.fetch_add(1, Ordering::Relaxed);
            }
            AccessType::Write => {
                let _ = self.mem_writes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Counts where an access was serviced and charges its cost.
    #[inline]
    pub fn record_service(&self, by: ServicedBy, weights: &CostWeights) {
        let counter = match by {
            ServicedBy::Cache => &self.cache_mem_accesses,
            ServicedBy::Primary => &self.primary_mem_accesses,
            ServicedBy::Secondary => &self.secondary_mem_accesses,
        };
        let _ = counter.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .memory_cycles
            .fetch_add(weights.cost(by), Ordering::Relaxed);
    }

    /// Reads every counter.
    pub fn snapshot(&self) -> AccessSnapshot {
        AccessSnapshot {
            mem_accesses_total: self.mem_accesses_total.load(Ordering::Relaxed),
            mem_reads: self.mem_reads.load(Ordering::Relaxed),
            mem_writes: self.mem_writes.load(Ordering::Relaxed),
            cache_mem_accesses: self.cache_mem_accesses.load(Ordering::Relaxed),
            primary_mem_accesses: self.primary_mem_accesses.load(Ordering::Relaxed),
            secondary_mem_accesses: self.secondary_mem_accesses.load(Ordering::Relaxed),
            memory_cycles: self.memory_cycles.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`AccessCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccessSnapshot {
    /// Reads plus writes.
    pub mem_accesses_total: u64,
    /// Reads issued.
    pub mem_reads: u64,
    /// Writes issued.
    pub mem_writes: u64,
    /// Accesses serviced by the cache.
    pub cache_mem_accesses: u64,
    /// Read misses serviced by the primary tier.
    pub primary_mem_accesses: u64,
    /// Read misses serviced by the secondary tier.
    pub secondary_mem_accesses: u64,
    /// Accumulated access cost in cycles.
    pub memory_cycles: u64,
}

/// Section names for selective report output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["accesses", "tiers", "cycles"];

impl AccessSnapshot {
    /// Fraction of reads that hit in the cache, in `[0, 1]`.
    ///
    /// Writes always land in the cache and are excluded. Returns 0 when no
    /// read has been issued.
    pub fn read_hit_rate(&self) -> f64 {
        if self.mem_reads == 0 {
            return 0.0;
        }
        let read_hits = self.cache_mem_accesses.saturating_sub(self.mem_writes);
        read_hits as f64 / self.mem_reads as f64
    }

    /// Mean cycles per access; 0 when no access has been issued.
    pub fn average_cycles(&self) -> f64 {
        if self.mem_accesses_total == 0 {
            return 0.0;
        }
        self.memory_cycles as f64 / self.mem_accesses_total as f64
    }

    /// Serializes the snapshot as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Renders only the requested report sections.
    ///
    /// Each element of `sections` should be one of `"accesses"`, `"tiers"`, or
    /// `"cycles"`. An empty slice renders every section.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let total = self.mem_accesses_total.max(1) as f64;
        let mut out = String::new();

        out.push_str("==========================================================\n");
        out.push_str("MEMORY ACCESS STATISTICS\n");
        out.push_str("==========================================================\n");
        if want("accesses") {
            out.push_str(&format!("mem.accesses             {}\n", self.mem_accesses_total));
            out.push_str(&format!("mem.reads                {}\n", self.mem_reads));
            out.push_str(&format!("mem.writes               {}\n", self.mem_writes));
            out.push_str("----------------------------------------------------------\n");
        }
        if want("tiers") {
            let line = |name: &str, count: u64| {
                format!(
                    "  {:<10} {:<10} ({:.2}%)\n",
                    name,
                    count,
                    (count as f64 / total) * 100.0
                )
            };
            out.push_str("SERVICED BY\n");
            out.push_str(&line("cache", self.cache_mem_accesses));
            out.push_str(&line("primary", self.primary_mem_accesses));
            out.push_str(&line("secondary", self.secondary_mem_accesses));
            out.push_str(&format!(
                "  read_hit_rate          {:.2}%\n",
                self.read_hit_rate() * 100.0
            ));
            out.push_str("----------------------------------------------------------\n");
        }
        if want("cycles") {
            out.push_str(&format!("mem.cycles               {}\n", self.memory_cycles));
            out.push_str(&format!("mem.cycles_per_access    {:.4}\n", self.average_cycles()));
        }
        out.push_str("==========================================================\n");
        out
    }

    /// Prints only the requested report sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints every report section to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

/// A simulated process as seen by the memory manager.
///
/// The manager reads the weights and bumps the counters; it never owns either.
pub trait Process: Sync {
    /// Process identifier, tagged on access traces.
    fn pid(&self) -> u32;

    /// Cost weights for this process's accesses.
    fn weights(&self) -> &CostWeights;

    /// Counters charged by this process's accesses.
    fn counters(&self) -> &AccessCounters;
}

/// Minimal process carrying only what the memory manager needs.
#[derive(Debug, Default)]
pub struct SimProcess {
    /// Process identifier, tagged on access traces.
    pub pid: u32,
    /// Access cost weights.
    pub weights: CostWeights,
    /// Access counters.
    pub counters: AccessCounters,
}

impl SimProcess {
    /// Creates a process with zeroed counters.
    pub fn new(pid: u32, weights: CostWeights) -> Self {
        Self {
            pid,
            weights,
            counters: AccessCounters::new(),
        }
    }

    /// Reads this process's counters.
    pub fn snapshot(&self) -> AccessSnapshot {
        self.counters.snapshot()
    }
}

impl Process for SimProcess {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn weights(&self) -> &CostWeights {
        &self.weights
    }

    fn counters(&self) -> &AccessCounters {
        &self.counters
    }
}

/// Hierarchy-wide counters not attributable to any process.
#[derive(Debug, Default)]
pub struct HierarchyStats {
    /// Lines filled into the cache from a tier on a read miss.
    pub fills: AtomicU64,
    /// Lines evicted for capacity (clean or dirty).
    pub evictions: AtomicU64,
    /// Evictions of clean lines (no tier I/O).
    pub clean_evictions: AtomicU64,
    /// Dirty words written back to a tier, by eviction or flush.
    pub write_backs: AtomicU64,
    /// Calls to flush.
    pub flushes: AtomicU64,
}

impl HierarchyStats {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        let _ = counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads every counter.
    pub fn snapshot(&self) -> HierarchySnapshot {
        HierarchySnapshot {
            fills: self.fills.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            clean_evictions: self.clean_evictions.load(Ordering::Relaxed),
            write_backs: self.write_backs.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`HierarchyStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HierarchySnapshot {
    /// Lines filled on read misses.
    pub fills: u64,
    /// Capacity evictions.
    pub evictions: u64,
    /// Clean capacity evictions.
    pub clean_evictions: u64,
    /// Words written back to tiers.
    pub write_backs: u64,
    /// Flush calls.
    pub flushes: u64,
}
