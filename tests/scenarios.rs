//! 范围缓存端到端场景
//!
//! 覆盖 floor 查找、重叠驱逐、池耗尽和插入/驱逐往返。

use lba_range_cache::{CacheConfig, ErrorKind, Floor, NodeId, RangeCache};

fn paranoid(capacity: usize) -> RangeCache {
    RangeCache::with_config(CacheConfig {
        capacity,
        paranoid: true,
    })
}

fn spans(cache: &RangeCache) -> Vec<(u64, u64)> {
    cache.iter().map(|r| (r.key, r.end())).collect()
}

/// 先序遍历树形状：(键, 高度, 左孩子键, 右孩子键)
fn shape(cache: &RangeCache) -> Vec<(u64, u32, Option<u64>, Option<u64>)> {
    let arena = cache.arena();
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = cache.tavl().root().into_iter().collect();
    while let Some(node) = stack.pop() {
        let n = &arena[node];
        out.push((
            arena.key_of(node),
            n.height(),
            n.left().map(|l| arena.key_of(l)),
            n.right().map(|r| arena.key_of(r)),
        ));
        stack.extend(n.right());
        stack.extend(n.left());
    }
    out
}

#[test]
fn test_disjoint_middle_insert_keeps_neighbours() {
    let mut cache = paranoid(4);
    cache.insert_range(100, 10).unwrap();
    cache.insert_range(200, 10).unwrap();
    cache.insert_range(150, 10).unwrap();

    assert_eq!(spans(&cache), [(100, 110), (150, 160), (200, 210)]);
    assert_eq!(cache.active_count(), 3);
}

#[test]
fn test_overlap_from_below() {
    let mut cache = paranoid(2);
    cache.insert_range(100, 10).unwrap();
    cache.insert_range(105, 20).unwrap();

    assert_eq!(spans(&cache), [(105, 125)]);
    assert_eq!(cache.active_count(), 1);
}

#[test]
fn test_insert_spanning_three_ranges() {
    let mut cache = paranoid(3);
    cache.insert_range(0, 10).unwrap();
    cache.insert_range(20, 10).unwrap();
    cache.insert_range(40, 10).unwrap();

    // 池已满，先腾出一个段
    assert_eq!(
        cache.insert_range(5, 40).unwrap_err().kind(),
        ErrorKind::NoSpace
    );
    let mut roomy = paranoid(4);
    for (key, blocks) in [(0, 10), (20, 10), (40, 10), (5, 40)] {
        roomy.insert_range(key, blocks).unwrap();
    }
    assert_eq!(spans(&roomy), [(5, 45)]);
    assert_eq!(roomy.active_count(), 1);
    assert_eq!(roomy.free_count(), 3);
}

#[test]
fn test_floor_on_empty_index() {
    let cache = paranoid(4);
    for lba in [0, 7, 4096, u64::MAX] {
        assert_eq!(cache.search_floor(lba), Floor::Lowest);
    }
}

#[test]
fn test_pool_exhaustion_preserves_state() {
    let capacity = 16;
    let mut cache = paranoid(capacity);
    for i in 0..capacity as u64 {
        cache.insert_range(i * 32, 16).unwrap();
    }
    let before = spans(&cache);

    let err = cache.insert_range(10_000, 8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSpace);
    assert_eq!(spans(&cache), before);
    assert_eq!(cache.active_count() + cache.free_count(), capacity);
    cache.assert_sane();
}

#[test]
fn test_insert_then_evict_round_trip() {
    let mut cache = paranoid(8);
    // 完全平衡的三层树，新叶子不会触发旋转
    for key in [400u64, 200, 600, 100, 300, 500, 700] {
        cache.insert_range(key, 10).unwrap();
    }
    let shape_before = shape(&cache);
    let spans_before = spans(&cache);

    let seg = cache.insert_range(250, 10).unwrap();
    assert_eq!(cache.active_count(), 8);
    cache.evict(seg).unwrap();

    assert_eq!(shape(&cache), shape_before);
    assert_eq!(spans(&cache), spans_before);
    assert_eq!(cache.active_count(), 7);
    assert_eq!(cache.free_count(), 1);
}

#[test]
fn test_drain_after_churn() {
    let mut cache = paranoid(32);
    for i in 0..200u64 {
        if cache.free_count() == 0 {
            cache.evict_floor((i * 7919) % 2_000).unwrap();
        }
        cache.insert_range((i * 104_729) % 2_000, 10 + (i % 20) as u32).unwrap();
    }
    let resident = cache.active_count();
    assert_eq!(cache.clear(), resident);
    assert!(cache.is_empty());
    assert_eq!(cache.free_count(), 32);
}
