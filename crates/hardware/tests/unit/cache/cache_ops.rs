//! Cache Unit Tests.
//!
//! Exercises the cache directly, without a manager: timestamps are supplied
//! by hand so eviction order is fully determined by the test.

use pretty_assertions::assert_eq;
use rstest::rstest;
use tiermem_core::cache::{Cache, EvictedLine};
use tiermem_core::common::MemoryError;
use tiermem_core::config::{CacheConfig, VictimIndex};

fn cache(capacity: usize, kind: VictimIndex) -> Cache {
    Cache::with_index(capacity, kind).unwrap()
}

fn addresses(cache: &Cache) -> Vec<u32> {
    cache.lines().iter().map(|line| line.address).collect()
}

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn zero_capacity_is_rejected() {
    assert_eq!(Cache::new(0).unwrap_err(), MemoryError::ZeroCacheCapacity);
    assert_eq!(
        Cache::from_config(&CacheConfig::with_capacity(0)).unwrap_err(),
        MemoryError::ZeroCacheCapacity
    );
}

#[test]
fn new_cache_is_empty() {
    let cache = Cache::new(4).unwrap();
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 4);
    assert_eq!(cache.get(0), None);
}

// ══════════════════════════════════════════════════════════
// 2. Hit / Miss
// ══════════════════════════════════════════════════════════

#[rstest]
fn put_then_get_hits_clean(#[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex) {
    let mut cache = cache(2, kind);
    assert_eq!(cache.put(10, 0xAA, 1), None);

    assert_eq!(cache.get(10), Some(0xAA));
    let line = cache.line(10).unwrap();
    assert!(!line.dirty);
    assert_eq!(line.last_used, 1);
}

#[test]
fn get_does_not_refresh_recency() {
    let mut cache = Cache::new(2).unwrap();
    let _ = cache.put(1, 100, 1);
    let _ = cache.put(2, 200, 2);

    // Repeated lookups of 1 must not save it from eviction.
    for _ in 0..5 {
        assert_eq!(cache.get(1), Some(100));
    }
    let evicted = cache.put(3, 300, 3).unwrap();
    assert_eq!(evicted.address, 1);
}

#[test]
fn touch_refreshes_recency_without_dirtying() {
    let mut cache = Cache::new(2).unwrap();
    let _ = cache.put(1, 100, 1);
    let _ = cache.put(2, 200, 2);

    assert!(cache.touch(1, 3));
    assert!(!cache.touch(99, 4));
    assert!(!cache.line(1).unwrap().dirty);

    let evicted = cache.put(3, 300, 5).unwrap();
    assert_eq!(evicted.address, 2);
}

// ══════════════════════════════════════════════════════════
// 3. Write path (write-back, write-allocate)
// ══════════════════════════════════════════════════════════

#[test]
fn update_absent_allocates_dirty_line() {
    let mut cache = Cache::new(2).unwrap();
    assert_eq!(cache.update(5, 7, 1), None);

    let line = cache.line(5).unwrap();
    assert!(line.dirty);
    assert_eq!(line.value, 7);
    assert_eq!(cache.dirty_count(), 1);
}

#[test]
fn update_present_overwrites_and_dirties() {
    let mut cache = Cache::new(2).unwrap();
    let _ = cache.put(5, 1, 1);
    assert_eq!(cache.update(5, 2, 4), None);

    let line = cache.line(5).unwrap();
    assert_eq!(line.value, 2);
    assert!(line.dirty);
    assert_eq!(line.last_used, 4);
    assert_eq!(cache.len(), 1);
}

#[test]
fn dirty_line_keeps_latest_value() {
    let mut cache = Cache::new(1).unwrap();
    for (ts, value) in [(1, 10), (2, 20), (3, 30)] {
        let _ = cache.update(0, value, ts);
    }
    let evicted = cache.update(1, 0, 4).unwrap();
    assert_eq!(
        evicted,
        EvictedLine {
            address: 0,
            value: 30,
            dirty: true
        }
    );
}

#[test]
fn put_on_dirty_line_keeps_written_value() {
    let mut cache = Cache::new(2).unwrap();
    let _ = cache.update(3, 99, 1);
    assert_eq!(cache.put(3, 0, 2), None);

    let line = cache.line(3).unwrap();
    assert_eq!(line.value, 99);
    assert!(line.dirty);
    assert_eq!(line.last_used, 2);
}

#[test]
fn put_on_clean_line_replaces_value() {
    let mut cache = Cache::new(2).unwrap();
    let _ = cache.put(3, 1, 1);
    let _ = cache.put(3, 2, 2);
    assert_eq!(cache.get(3), Some(2));
    assert_eq!(cache.len(), 1);
}

// ══════════════════════════════════════════════════════════
// 4. Eviction
// ══════════════════════════════════════════════════════════

#[rstest]
fn filling_to_capacity_evicts_nothing(
    #[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex,
) {
    let mut cache = cache(3, kind);
    for addr in 0..3 {
        assert_eq!(cache.put(addr, addr, u64::from(addr) + 1), None);
    }
    assert_eq!(cache.len(), 3);
}

#[rstest]
fn one_eviction_per_insertion_beyond_capacity(
    #[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex,
) {
    let mut cache = cache(3, kind);
    let mut evictions = 0;
    for addr in 0..10u32 {
        if cache.put(addr, 0, u64::from(addr)).is_some() {
            evictions += 1;
        }
        assert!(cache.len() <= 3);
    }
    assert_eq!(evictions, 7);
}

#[rstest]
fn evicts_oldest_timestamp(#[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex) {
    let mut cache = cache(3, kind);
    let _ = cache.put(10, 0, 5);
    let _ = cache.put(20, 0, 2);
    let _ = cache.put(30, 0, 9);

    let evicted = cache.put(40, 0, 10).unwrap();
    assert_eq!(evicted.address, 20);
    assert_eq!(addresses(&cache), vec![10, 30, 40]);
}

#[rstest]
fn equal_timestamps_evict_earliest_insertion(
    #[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex,
) {
    let mut cache = cache(3, kind);
    let _ = cache.put(30, 0, 1);
    let _ = cache.put(10, 0, 1);
    let _ = cache.put(20, 0, 1);

    assert_eq!(cache.put(40, 0, 1).unwrap().address, 30);
    assert_eq!(cache.put(50, 0, 1).unwrap().address, 10);
    assert_eq!(cache.put(60, 0, 1).unwrap().address, 20);
}

#[test]
fn clean_victim_reports_not_dirty() {
    let mut cache = Cache::new(1).unwrap();
    let _ = cache.put(1, 11, 1);
    let evicted = cache.put(2, 22, 2).unwrap();
    assert!(!evicted.needs_write_back());
    assert_eq!(evicted.value, 11);
}

#[test]
fn update_absent_at_capacity_evicts() {
    let mut cache = Cache::new(2).unwrap();
    let _ = cache.update(5, 7, 1);
    let _ = cache.update(6, 9, 2);
    let evicted = cache.update(0, 3, 3).unwrap();

    assert_eq!(
        evicted,
        EvictedLine {
            address: 5,
            value: 7,
            dirty: true
        }
    );
    assert_eq!(addresses(&cache), vec![6, 0]);
}

#[rstest]
fn victim_for_previews_eviction_without_changing_state(
    #[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex,
) {
    let mut cache = cache(2, kind);
    let _ = cache.update(7, 70, 1);
    assert_eq!(cache.victim_for(8), None);

    let _ = cache.put(8, 80, 2);
    assert_eq!(cache.victim_for(7), None);
    assert_eq!(cache.victim_for(8), None);
    let preview = cache.victim_for(9).unwrap();
    assert_eq!(
        preview,
        EvictedLine {
            address: 7,
            value: 70,
            dirty: true
        }
    );
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.dirty_count(), 1);

    assert_eq!(cache.put(9, 90, 3), Some(preview));
}

#[test]
fn reinsertion_gets_fresh_sequence() {
    let mut cache = Cache::new(2).unwrap();
    let _ = cache.put(1, 0, 1);
    let _ = cache.put(2, 0, 1);
    let first_seq = cache.line(1).unwrap().insertion_seq();

    let _ = cache.put(3, 0, 1); // evicts 1
    let _ = cache.put(1, 0, 1); // evicts 2, re-inserts 1
    assert!(cache.line(1).unwrap().insertion_seq() > first_seq);
    assert_eq!(addresses(&cache), vec![3, 1]);
}

// ══════════════════════════════════════════════════════════
// 5. Dirty bookkeeping for flush
// ══════════════════════════════════════════════════════════

#[test]
fn dirty_lines_oldest_first_and_clean() {
    let mut cache = Cache::new(4).unwrap();
    let _ = cache.update(1, 10, 3);
    let _ = cache.put(2, 20, 1);
    let _ = cache.update(3, 30, 2);

    let dirty: Vec<u32> = cache.dirty_lines().iter().map(|l| l.address).collect();
    assert_eq!(dirty, vec![3, 1]);
    // Listing leaves state untouched.
    assert_eq!(cache.dirty_count(), 2);

    assert!(cache.clean(3));
    assert!(!cache.clean(3));
    assert!(!cache.clean(2));
    assert!(!cache.clean(42));
    assert_eq!(cache.dirty_count(), 1);
    assert_eq!(cache.get(3), Some(30));
}
