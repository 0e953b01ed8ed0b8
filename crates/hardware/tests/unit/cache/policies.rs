//! Victim Index Tests.
//!
//! `ScanIndex` and `OrderedIndex` are two implementations of one rule, so any
//! history of puts, updates, and touches must produce the same victims.

use proptest::prelude::*;
use std::collections::HashMap;
use tiermem_core::cache::Cache;
use tiermem_core::cache::policies::{OrderedIndex, Recency, RecencyIndex, ScanIndex};
use tiermem_core::config::VictimIndex;

#[derive(Clone, Debug)]
enum Op {
    Put(u32, u32),
    Update(u32, u32),
    Touch(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..12u32, any::<u32>()).prop_map(|(a, v)| Op::Put(a, v)),
        (0..12u32, any::<u32>()).prop_map(|(a, v)| Op::Update(a, v)),
        (0..12u32).prop_map(Op::Touch),
    ]
}

fn apply(cache: &mut Cache, op: &Op, ts: u64) -> Option<(u32, u32, bool)> {
    let evicted = match *op {
        Op::Put(a, v) => cache.put(a, v, ts),
        Op::Update(a, v) => cache.update(a, v, ts),
        Op::Touch(a) => {
            let _ = cache.touch(a, ts);
            None
        }
    };
    evicted.map(|e| (e.address, e.value, e.dirty))
}

proptest! {
    #[test]
    fn scan_and_ordered_agree(
        capacity in 1usize..6,
        ops in prop::collection::vec(op(), 1..200),
        // Coarse timestamps force plenty of ties.
        divisor in 1u64..4,
    ) {
        let mut scan = Cache::with_index(capacity, VictimIndex::Scan).unwrap();
        let mut ordered = Cache::with_index(capacity, VictimIndex::Ordered).unwrap();

        for (i, op) in ops.iter().enumerate() {
            let ts = i as u64 / divisor;
            prop_assert_eq!(apply(&mut scan, op, ts), apply(&mut ordered, op, ts));
            prop_assert_eq!(scan.lines(), ordered.lines());
            prop_assert!(scan.len() <= capacity);
        }
    }
}

#[test]
fn scan_index_ignores_bookkeeping_calls() {
    let mut index = ScanIndex::new();
    index.insert(1, Recency { last_used: 0, seq: 0 });
    index.remove(1, Recency { last_used: 0, seq: 0 });
    // With no lines handed in there is nothing to evict.
    assert_eq!(index.victim(&HashMap::new()), None);
}

#[test]
fn ordered_index_tracks_len() {
    let mut index = OrderedIndex::new();
    assert!(index.is_empty());
    index.insert(7, Recency { last_used: 1, seq: 0 });
    index.insert(8, Recency { last_used: 1, seq: 1 });
    assert_eq!(index.len(), 2);
    assert_eq!(index.victim(&HashMap::new()), Some(7));
}

#[test]
fn recency_orders_by_timestamp_then_sequence() {
    let older = Recency { last_used: 1, seq: 9 };
    let newer = Recency { last_used: 2, seq: 0 };
    let tie_late = Recency { last_used: 2, seq: 1 };
    assert!(older < newer);
    assert!(newer < tie_late);
}
