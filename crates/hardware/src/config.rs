//! Configuration system for the memory hierarchy.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the hierarchy. It provides:
//! 1. **Defaults:** Baseline tier sizes, cache capacity, and cost weights.
//! 2. **Structures:** Config for the storage tiers, the cache, and default process weights.
//! 3. **Enums:** Victim index selection.
//!
//! Configuration is supplied as JSON by the simulator driver, or use `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::common::{ADDRESS_SPACE_WORDS, MemoryError, Tier};
use crate::stats::CostWeights;

/// Default configuration constants.
///
/// These values define the baseline hierarchy when not explicitly
/// overridden in a JSON configuration.
pub(crate) mod defaults {
    /// Words in the primary tier.
    pub const PRIMARY_SIZE: usize = 1024;

    /// Words in the secondary tier.
    pub const SECONDARY_SIZE: usize = 4096;

    /// Lines held by the cache.
    pub const CACHE_CAPACITY: usize = 16;

    /// Cycles charged for an access satisfied by the cache (and for every write).
    pub const CACHE_COST: u64 = 1;

    /// Cycles charged for a miss satisfied by the primary tier.
    pub const PRIMARY_COST: u64 = 10;

    /// Cycles charged for a miss satisfied by the secondary tier.
    pub const SECONDARY_COST: u64 = 50;
}

/// Victim index used by the cache.
///
/// Both indexes select the same victim; they differ only in cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum VictimIndex {
    /// Flat scan over resident lines on each eviction.
    ///
    /// O(capacity) eviction with no bookkeeping; the baseline for small caches.
    #[default]
    Scan,
    /// Recency-ordered tree.
    ///
    /// O(log capacity) eviction at the price of one tree update per access.
    Ordered,
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for [`Config`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration describes an unusable hierarchy.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] MemoryError),
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use tiermem_core::config::{Config, VictimIndex};
///
/// let json = r#"{
///     "memory": { "primary_size": 4, "secondary_size": 4 },
///     "cache": { "capacity": 2, "index": "Ordered" },
///     "weights": { "cache": 1, "primary": 10, "secondary": 50 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.primary_size, 4);
/// assert_eq!(config.cache.index, VictimIndex::Ordered);
/// assert!(config.cache.touch_on_read_hit);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Storage tier sizes
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Default cost weights for processes created by the driver
    #[serde(default)]
    pub weights: CostWeights,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks that the hierarchy described is constructible.
    ///
    /// # Errors
    ///
    /// Returns the same [`MemoryError`] the manager would raise at construction.
    pub fn validate(&self) -> Result<(), MemoryError> {
        self.memory.validate()?;
        self.cache.validate()
    }
}

/// Storage tier sizes, in words.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Primary tier size; also the tier boundary
    #[serde(default = "MemoryConfig::default_primary_size")]
    pub primary_size: usize,

    /// Secondary tier size
    #[serde(default = "MemoryConfig::default_secondary_size")]
    pub secondary_size: usize,
}

impl MemoryConfig {
    fn default_primary_size() -> usize {
        defaults::PRIMARY_SIZE
    }

    fn default_secondary_size() -> usize {
        defaults::SECONDARY_SIZE
    }

    /// Checks both tiers are non-empty and together fit the 32-bit address space.
    ///
    /// # Errors
    ///
    /// [`MemoryError::ZeroSizedTier`] or [`MemoryError::AddressSpaceOverflow`].
    pub fn validate(&self) -> Result<(), MemoryError> {
        validate_tiers(self.primary_size, self.secondary_size)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            primary_size: defaults::PRIMARY_SIZE,
            secondary_size: defaults::SECONDARY_SIZE,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Number of lines held
    #[serde(default = "CacheConfig::default_capacity")]
    pub capacity: usize,

    /// Victim index implementation
    #[serde(default)]
    pub index: VictimIndex,

    /// Refresh a line's recency when a read hits it.
    ///
    /// When false, recency is only set by fills and writes.
    #[serde(default = "CacheConfig::default_touch_on_read_hit")]
    pub touch_on_read_hit: bool,
}

impl CacheConfig {
    fn default_capacity() -> usize {
        defaults::CACHE_CAPACITY
    }

    fn default_touch_on_read_hit() -> bool {
        true
    }

    /// Returns a default cache configuration with `capacity` lines.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Checks the cache holds at least one line.
    ///
    /// # Errors
    ///
    /// [`MemoryError::ZeroCacheCapacity`].
    pub const fn validate(&self) -> Result<(), MemoryError> {
        if self.capacity == 0 {
            return Err(MemoryError::ZeroCacheCapacity);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CACHE_CAPACITY,
            index: VictimIndex::default(),
            touch_on_read_hit: true,
        }
    }
}

/// Validates a pair of tier sizes.
pub(crate) fn validate_tiers(primary: usize, secondary: usize) -> Result<(), MemoryError> {
    if primary == 0 {
        return Err(MemoryError::ZeroSizedTier {
            tier: Tier::Primary,
        });
    }
    if secondary == 0 {
        return Err(MemoryError::ZeroSizedTier {
            tier: Tier::Secondary,
        });
    }
    if primary as u64 + secondary as u64 > ADDRESS_SPACE_WORDS {
        return Err(MemoryError::AddressSpaceOverflow { primary, secondary });
    }
    Ok(())
}
