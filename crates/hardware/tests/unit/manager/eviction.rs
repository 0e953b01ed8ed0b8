use crate::common::harness::TestContext;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tiermem_core::config::{CacheConfig, VictimIndex};

fn context(kind: VictimIndex, capacity: usize, touch: bool) -> TestContext {
    let config = CacheConfig {
        capacity,
        index: kind,
        touch_on_read_hit: touch,
    };
    TestContext::with_tiers(&[0; 8], &[0; 8], &config)
}

#[rstest]
fn next_distinct_access_evicts_oldest(
    #[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex,
) {
    let ctx = context(kind, 3, true);
    ctx.write(9, 1);
    let _ = ctx.read(2);
    ctx.write(12, 1);
    assert_eq!(ctx.resident(), vec![9, 2, 12]);

    let _ = ctx.read(4);
    assert_eq!(ctx.resident(), vec![2, 12, 4]);
    assert_eq!(ctx.mem.stats().snapshot().evictions, 1);
}

#[rstest]
fn read_hit_refreshes_recency(
    #[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex,
) {
    let ctx = context(kind, 2, true);
    ctx.write(1, 10);
    ctx.write(2, 20);
    assert_eq!(ctx.read(1), 10);

    ctx.write(3, 30);
    assert_eq!(ctx.resident(), vec![1, 3]);
}

#[rstest]
fn read_hit_without_touch_keeps_fill_order(
    #[values(VictimIndex::Scan, VictimIndex::Ordered)] kind: VictimIndex,
) {
    let ctx = context(kind, 2, false);
    ctx.write(1, 10);
    ctx.write(2, 20);
    assert_eq!(ctx.read(1), 10);

    ctx.write(3, 30);
    assert_eq!(ctx.resident(), vec![2, 3]);
    assert_eq!(ctx.mem.backing_word(1).unwrap(), 10);
}

#[test]
fn write_hit_refreshes_recency() {
    let ctx = TestContext::new(4, 4, 2);
    ctx.write(1, 10);
    ctx.write(2, 20);
    ctx.write(1, 11);

    ctx.write(3, 30);
    assert_eq!(ctx.resident(), vec![1, 3]);
    assert_eq!(ctx.mem.backing_word(2).unwrap(), 20);
}

#[test]
fn capacity_one_evicts_on_every_new_address() {
    let ctx = TestContext::ordered(4, 4, 1);
    for address in 0..8 {
        let _ = ctx.read(address);
        assert_eq!(ctx.resident(), vec![address]);
    }
    assert_eq!(ctx.mem.stats().snapshot().evictions, 7);
}

#[test]
fn resident_lines_carry_stamps() {
    let ctx = TestContext::scenario();
    ctx.write(4, 1);
    let _ = ctx.read(0);

    let lines = ctx.mem.resident_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!((lines[0].address, lines[0].last_used, lines[0].dirty), (4, 1, true));
    assert_eq!((lines[1].address, lines[1].last_used, lines[1].dirty), (0, 2, false));
}
