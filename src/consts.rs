//! 范围缓存常量定义

/// 默认段数量（竞技场容量）
pub const DEFAULT_SEGMENT_COUNT: usize = 100;

/// 成员链表数量（free / LRU / dirty / locked）
pub const LIST_COUNT: usize = 4;

/// 每个成员链表占用的哨兵段数量（head + tail）
pub const SENTINELS_PER_LIST: usize = 2;

/// 竞技场中保留给链表哨兵的段槽位数量
pub const LIST_SENTINEL_SLOTS: usize = LIST_COUNT * SENTINELS_PER_LIST;

/// 竞技场中保留给线索哨兵的节点槽位数量（lowest + highest）
pub const THREAD_SENTINEL_SLOTS: usize = 2;
