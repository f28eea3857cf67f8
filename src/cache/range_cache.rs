//! 范围缓存（一致性管理）
//!
//! 在 TAVL 索引、竞技场和成员链表之上实现带驱逐的插入：
//! 新范围插入后，所有与它重叠的驻留段都被整段驱逐（从不拆分），
//! 因此任意两个驻留范围互不重叠。
//!
//! # 段的生命周期
//!
//! ```text
//! Free --insert_range--> 驻留 + LRU --evict / 重叠驱逐--> Free
//! ```
//!
//! 驻留段可以在 LRU / dirty / locked 之间移动，但始终恰好在一个活跃链表上。

use alloc::vec::Vec;

use super::config::{CacheConfig, CacheStats};
use crate::{
    arena::{Arena, ListKind, NodeId, SegmentId, SegmentRange},
    error::{Error, ErrorKind, Result},
    list::{ListIter, Lists},
    tavl::{Tavl, ThreadIter},
};

/// floor 查找结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floor {
    /// 地址小于所有驻留键（或索引为空），对应 `LOWEST` 哨兵
    Lowest,
    /// 键不大于地址的最大驻留段
    Segment(SegmentId),
}

impl Floor {
    /// 取出段句柄
    pub fn segment(self) -> Option<SegmentId> {
        match self {
            Floor::Lowest => None,
            Floor::Segment(seg) => Some(seg),
        }
    }
}

/// LBA 范围缓存
///
/// 单线程数据结构：所有修改操作都需要 `&mut self`。需要跨线程共享时，
/// 调用者应使用一把互斥锁保护整个缓存，插入与随后的重叠扫描不能与
/// 其他修改交错。
pub struct RangeCache {
    pub(super) arena: Arena,
    pub(super) tavl: Tavl,
    pub(super) lists: Lists,
    config: CacheConfig,
    stats: CacheStats,
}

impl RangeCache {
    /// 创建指定容量的范围缓存
    ///
    /// # 示例
    ///
    /// ```rust
    /// use lba_range_cache::RangeCache;
    ///
    /// let mut cache = RangeCache::new(4);
    /// let seg = cache.insert_range(100, 10).unwrap();
    /// assert_eq!(cache.lookup(105), Some(seg));
    /// assert_eq!(cache.active_count(), 1);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_config(CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    /// 按配置创建范围缓存
    ///
    /// 一次性分配全部段和节点，并把它们全部放入空闲池。
    pub fn with_config(config: CacheConfig) -> Self {
        let mut arena = Arena::new(config.capacity);
        let tavl = Tavl::new(&mut arena);
        let lists = Lists::new(&mut arena);
        log::debug!(
            "[RCACHE] initialized with {} segments (paranoid={})",
            config.capacity,
            config.paranoid
        );
        Self {
            arena,
            tavl,
            lists,
            config,
            stats: CacheStats::default(),
        }
    }

    /// 插入范围 `[key, key + blocks)`，驱逐所有与之重叠的驻留段
    ///
    /// # 返回
    ///
    /// 新范围所在段的句柄。段句柄在整个生命周期内稳定，
    /// 即使其配对的索引节点在删除其他段时发生交换。
    ///
    /// # 错误
    ///
    /// - `InvalidInput`：`blocks` 为 0，或范围结束位置溢出
    /// - `NoSpace`：空闲池为空，调用者需要先驱逐；此时状态不变
    pub fn insert_range(&mut self, key: u64, blocks: u32) -> Result<SegmentId> {
        if blocks == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Range must cover at least one block",
            ));
        }
        let end = key.checked_add(blocks as u64).ok_or(Error::new(
            ErrorKind::InvalidInput,
            "Range end overflows the LBA space",
        ))?;

        let Some(seg) = self.lists.pop_front(&mut self.arena, ListKind::Free) else {
            self.stats.exhausted += 1;
            log::warn!(
                "[RCACHE] insert [{:#x}..{:#x}) failed: all {} segments resident",
                key,
                end,
                self.capacity()
            );
            return Err(Error::new(
                ErrorKind::NoSpace,
                "No free segment available, evict before inserting",
            ));
        };
        self.arena[seg].key = key;
        self.arena[seg].blocks = blocks;

        // 从下方重叠的段最多一个：floor 段的结束位置越过新键
        if let Floor::Segment(below) = self.search_floor(key) {
            if self.arena[below].end() > key {
                log::debug!(
                    "[RCACHE] [{:#x}..{:#x}) hits [{:#x}..{:#x}), invalidating",
                    key,
                    end,
                    self.arena[below].key,
                    self.arena[below].end()
                );
                self.evict_resident(below);
                self.stats.overlap_evictions += 1;
            }
        }

        let node = self.arena.node_of(seg);
        self.tavl.insert(&mut self.arena, node);
        self.lists.push_back(&mut self.arena, ListKind::Lru, seg);
        log::debug!("[RCACHE] inserted [{:#x}..{:#x})", key, end);

        // 从上方重叠的段在线索上连续；每次驱逐后都通过段重新取节点
        loop {
            let node = self.arena.node_of(seg);
            let higher = self.arena[node]
                .higher
                .expect("resident node has no thread successor");
            if higher == NodeId::HIGHEST {
                break;
            }
            let victim = self.arena.seg_of(higher);
            if self.arena[victim].key >= end {
                break;
            }
            log::debug!(
                "[RCACHE] invalidating [{:#x}..{:#x}) overlapped by [{:#x}..{:#x})",
                self.arena[victim].key,
                self.arena[victim].end(),
                key,
                end
            );
            self.evict_resident(victim);
            self.stats.overlap_evictions += 1;
        }

        self.stats.inserts += 1;
        self.after_mutation();
        Ok(seg)
    }

    /// 驱逐一个驻留段：移出活跃链表、放回空闲池、从索引删除
    ///
    /// # 错误
    ///
    /// 段句柄无效或段不在索引中时返回 `InvalidInput`，状态不变。
    pub fn evict(&mut self, seg: SegmentId) -> Result<()> {
        self.ensure_resident(seg)?;
        self.evict_resident(seg);
        self.after_mutation();
        Ok(())
    }

    /// 驱逐 LRU 链表头部（最久之前插入或访问）的段
    pub fn evict_lru(&mut self) -> Option<SegmentId> {
        let seg = self.lists.get(ListKind::Lru).front(&self.arena)?;
        self.evict_resident(seg);
        self.after_mutation();
        Some(seg)
    }

    /// 驱逐 `lba` 的 floor 段；`lba` 小于所有驻留键时驱逐最低的驻留段
    ///
    /// 索引为空时返回 None。
    pub fn evict_floor(&mut self, lba: u64) -> Option<SegmentId> {
        let node = match self.tavl.search_floor(&self.arena, lba) {
            NodeId::LOWEST => self.arena[NodeId::LOWEST].higher?,
            node => node,
        };
        if node == NodeId::HIGHEST {
            return None;
        }
        let seg = self.arena.seg_of(node);
        self.evict_resident(seg);
        self.after_mutation();
        Some(seg)
    }

    /// 沿线索驱逐全部驻留段，返回驱逐数量
    pub fn clear(&mut self) -> usize {
        let mut count = 0;
        while let Some(first) = self.first_resident() {
            self.evict_resident(first);
            count += 1;
        }
        log::debug!("[RCACHE] cleared {} segments", count);
        self.after_mutation();
        count
    }

    /// 把驻留段移到 LRU 尾部（最近使用）
    pub fn touch(&mut self, seg: SegmentId) -> Result<()> {
        self.move_to(seg, ListKind::Lru)
    }

    /// 把驻留段移到另一个活跃链表尾部
    ///
    /// dirty / locked 是预留链表，移动不附带任何额外策略。
    pub fn move_to(&mut self, seg: SegmentId, kind: ListKind) -> Result<()> {
        if !kind.is_active() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Use evict to return a segment to the free list",
            ));
        }
        self.ensure_resident(seg)?;
        self.lists.detach(&mut self.arena, seg);
        self.lists.push_back(&mut self.arena, kind, seg);
        log::trace!("[RCACHE] segment {} moved to {:?}", seg.index(), kind);
        self.after_mutation();
        Ok(())
    }

    /// floor 查找：键不大于 `lba` 的最大驻留段
    pub fn search_floor(&self, lba: u64) -> Floor {
        self.to_floor(self.tavl.search_floor(&self.arena, lba))
    }

    /// 精确查找起始 LBA 为 `key` 的驻留段
    pub fn search_exact(&self, key: u64) -> Option<SegmentId> {
        self.tavl
            .search_exact(&self.arena, key)
            .map(|node| self.arena.seg_of(node))
    }

    /// 查找范围包含 `lba` 的驻留段
    pub fn lookup(&self, lba: u64) -> Option<SegmentId> {
        let seg = self.search_floor(lba).segment()?;
        (self.arena[seg].end() > lba).then_some(seg)
    }

    /// 与 [`search_floor`](Self::search_floor) 相同，并以 debug 级别记录下降路径
    pub fn dump_path(&self, lba: u64) -> Floor {
        self.to_floor(self.tavl.dump_path(&self.arena, lba))
    }

    /// 驻留段的范围；段不驻留时返回 None
    pub fn range(&self, seg: SegmentId) -> Option<SegmentRange> {
        if !self.is_resident(seg) {
            return None;
        }
        let s = &self.arena[seg];
        Some(SegmentRange {
            id: seg,
            key: s.key,
            blocks: s.blocks,
        })
    }

    /// 段是否驻留在索引中
    pub fn is_resident(&self, seg: SegmentId) -> bool {
        self.arena.is_segment(seg) && self.arena[seg].list.is_some_and(ListKind::is_active)
    }

    /// 段当前所在链表
    pub fn list_of(&self, seg: SegmentId) -> Option<ListKind> {
        if !self.arena.is_segment(seg) {
            return None;
        }
        self.arena[seg].list
    }

    /// 按 LBA 升序遍历驻留段
    pub fn iter(&self) -> ThreadIter<'_> {
        self.tavl.iter(&self.arena)
    }

    /// 从头到尾遍历指定成员链表
    pub fn list_iter(&self, kind: ListKind) -> ListIter<'_> {
        self.lists.get(kind).iter(&self.arena)
    }

    /// 驻留段的快照（升序）
    pub fn ranges(&self) -> Vec<SegmentRange> {
        self.iter().collect()
    }

    /// 驻留段数量
    pub fn active_count(&self) -> usize {
        self.tavl.active_nodes()
    }

    /// 空闲池中的段数量
    pub fn free_count(&self) -> usize {
        self.lists.get(ListKind::Free).len()
    }

    /// 指定链表的长度
    pub fn list_len(&self, kind: ListKind) -> usize {
        self.lists.get(kind).len()
    }

    /// 段池容量
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// 索引是否为空
    pub fn is_empty(&self) -> bool {
        self.tavl.is_empty()
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// 获取配置
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// 只读访问索引（用于检查树形状）
    pub fn tavl(&self) -> &Tavl {
        &self.tavl
    }

    /// 只读访问竞技场
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    fn to_floor(&self, node: NodeId) -> Floor {
        if node == NodeId::LOWEST {
            Floor::Lowest
        } else {
            Floor::Segment(self.arena.seg_of(node))
        }
    }

    fn first_resident(&self) -> Option<SegmentId> {
        let first = self.arena[NodeId::LOWEST].higher?;
        (first != NodeId::HIGHEST).then(|| self.arena.seg_of(first))
    }

    fn ensure_resident(&self, seg: SegmentId) -> Result<()> {
        if self.is_resident(seg) {
            Ok(())
        } else {
            log::warn!("[RCACHE] segment {} is not resident", seg.index());
            Err(Error::new(
                ErrorKind::InvalidInput,
                "Segment is not resident in the cache",
            ))
        }
    }

    /// 驱逐已确认驻留的段
    fn evict_resident(&mut self, seg: SegmentId) {
        self.lists.detach(&mut self.arena, seg);
        self.lists.push_back(&mut self.arena, ListKind::Free, seg);
        self.tavl.note_removed();
        self.tavl.remove(&mut self.arena, seg);
        self.stats.evictions += 1;
        log::debug!(
            "[RCACHE] evicted [{:#x}..{:#x}), active={}",
            self.arena[seg].key,
            self.arena[seg].end(),
            self.tavl.active_nodes()
        );
    }

    fn after_mutation(&self) {
        if self.config.paranoid {
            self.assert_sane();
        }
    }
}

impl core::fmt::Debug for RangeCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RangeCache")
            .field("capacity", &self.capacity())
            .field("active", &self.active_count())
            .field("free", &self.free_count())
            .field("paranoid", &self.config.paranoid)
            .field("stats", &self.stats)
            .finish()
    }
}
