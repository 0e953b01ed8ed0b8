//! Tiered memory hierarchy model.
//!
//! This crate implements the memory instrumentation core of a process simulator:
//! 1. **Storage:** Primary and secondary word stores forming one contiguous address space.
//! 2. **Cache:** A fully associative write-back, write-allocate cache with LRU eviction.
//! 3. **Manager:** Address routing, miss fills, dirty write-back, and the logical clock.
//! 4. **Accounting:** Lock-free per-process counters and cycle costs.
//! 5. **Configuration:** JSON-deserializable sizing and cost defaults.
//!
//! ```
//! use tiermem_core::config::CacheConfig;
//! use tiermem_core::stats::{CostWeights, SimProcess};
//! use tiermem_core::MemoryManager;
//!
//! let mem = MemoryManager::with_cache(4, 4, &CacheConfig::with_capacity(2)).unwrap();
//! let proc = SimProcess::new(1, CostWeights::new(1, 10, 50));
//!
//! mem.write(5, 7, &proc).unwrap();
//! mem.write(6, 9, &proc).unwrap();
//! mem.write(0, 3, &proc).unwrap(); // evicts address 5
//!
//! assert_eq!(mem.backing_word(5).unwrap(), 7);
//! assert_eq!(mem.read(5, &proc).unwrap(), 7);
//! assert_eq!(proc.snapshot().secondary_mem_accesses, 1);
//! ```

/// Fully associative write-back cache and victim indexes.
pub mod cache;
/// Common types (tiers, routed addresses, access kinds, errors).
pub mod common;
/// Hierarchy configuration (defaults, tier sizes, cache options).
pub mod config;
/// The cache-fronted two-tier memory manager.
pub mod manager;
/// Per-process and hierarchy-wide access accounting.
pub mod stats;
/// Backing storage tiers.
pub mod storage;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Error type shared by every fallible operation.
pub use crate::common::MemoryError;
/// Entry point for simulated memory traffic.
pub use crate::manager::MemoryManager;
/// Process interface charged by the manager, and a minimal implementation.
pub use crate::stats::{Process, SimProcess};
