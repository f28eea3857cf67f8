//! 段结构
//!
//! 一个段描述一段已缓存的连续 LBA 范围 `[key, key + blocks)`。
//!
//! 段与索引节点在竞技场初始化时一一配对，之后只在空闲链表和活跃链表之间
//! 移动，从不销毁。链表链接使用竞技场句柄而不是指针。

use super::NodeId;

/// 段句柄（竞技场内的稳定下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    /// 句柄在竞技场中的下标
    pub const fn index(self) -> usize {
        self.0
    }
}

/// 成员链表类别
///
/// 段在任一时刻恰好属于其中一个链表。dirty 和 locked 是预留的扩展位，
/// 除了作为普通链表存在外没有附加策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// 空闲池
    Free,
    /// 最近使用顺序（尾部为最新）
    Lru,
    /// 脏段（预留）
    Dirty,
    /// 锁定段（预留）
    Locked,
}

impl ListKind {
    /// 全部链表类别
    pub const ALL: [ListKind; 4] = [ListKind::Free, ListKind::Lru, ListKind::Dirty, ListKind::Locked];

    /// 链表在管理结构中的槽位
    pub const fn slot(self) -> usize {
        match self {
            ListKind::Free => 0,
            ListKind::Lru => 1,
            ListKind::Dirty => 2,
            ListKind::Locked => 3,
        }
    }

    /// 该链表上的段是否驻留在索引中
    pub const fn is_active(self) -> bool {
        !matches!(self, ListKind::Free)
    }
}

/// 缓存段
#[derive(Debug, Clone)]
pub struct Segment {
    /// 成员链表前驱
    pub(crate) prev: Option<SegmentId>,
    /// 成员链表后继
    pub(crate) next: Option<SegmentId>,
    /// 配对的索引节点（链表哨兵没有）
    pub(crate) node: Option<NodeId>,
    /// 当前所在链表，仅用于诊断和计数
    pub(crate) list: Option<ListKind>,
    /// 起始 LBA
    pub(crate) key: u64,
    /// 块数量
    pub(crate) blocks: u32,
}

impl Segment {
    pub(crate) const fn new(node: Option<NodeId>) -> Self {
        Self {
            prev: None,
            next: None,
            node,
            list: None,
            key: 0,
            blocks: 0,
        }
    }

    /// 起始 LBA
    pub fn key(&self) -> u64 {
        self.key
    }

    /// 块数量
    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    /// 范围结束位置（不含）
    pub fn end(&self) -> u64 {
        self.key.saturating_add(self.blocks as u64)
    }

    /// 当前所在链表
    pub fn list(&self) -> Option<ListKind> {
        self.list
    }

    /// 是否已链接到某个链表
    pub(crate) fn is_linked(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }
}

/// 驻留段的只读快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    /// 段句柄
    pub id: SegmentId,
    /// 起始 LBA
    pub key: u64,
    /// 块数量
    pub blocks: u32,
}

impl SegmentRange {
    /// 范围结束位置（不含）
    pub fn end(&self) -> u64 {
        self.key.saturating_add(self.blocks as u64)
    }

    /// 范围是否包含给定 LBA
    pub fn contains(&self, lba: u64) -> bool {
        lba >= self.key && lba < self.end()
    }
}
