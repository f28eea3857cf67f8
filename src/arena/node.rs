//! 索引节点结构
//!
//! 节点同时参与两个结构：
//! - AVL 树（`left` / `right` / `height`）
//! - 按 LBA 排序的线索链表（`lower` / `higher`）

use super::SegmentId;

/// 节点句柄（竞技场内的稳定下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// 线索下界哨兵
    pub const LOWEST: NodeId = NodeId(0);

    /// 线索上界哨兵
    pub const HIGHEST: NodeId = NodeId(1);

    /// 句柄在竞技场中的下标
    pub const fn index(self) -> usize {
        self.0
    }

    /// 是否为线索哨兵
    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::LOWEST.0 || self.0 == Self::HIGHEST.0
    }
}

/// TAVL 树节点
#[derive(Debug, Clone)]
pub struct IndexNode {
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) lower: Option<NodeId>,
    pub(crate) higher: Option<NodeId>,
    /// 配对的段（哨兵节点没有）
    pub(crate) seg: Option<SegmentId>,
    /// 子树高度，叶子为 1
    pub(crate) height: u32,
}

impl IndexNode {
    pub(crate) const fn new(seg: Option<SegmentId>) -> Self {
        Self {
            left: None,
            right: None,
            lower: None,
            higher: None,
            seg,
            height: 1,
        }
    }

    /// 清除树链接，恢复为孤立叶子
    pub(crate) fn reset_tree_links(&mut self) {
        self.left = None;
        self.right = None;
        self.height = 1;
    }

    /// 是否完全脱离树和线索
    pub(crate) fn is_detached(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.lower.is_none() && self.higher.is_none()
    }

    /// 左孩子
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// 右孩子
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// 线索前驱
    pub fn lower(&self) -> Option<NodeId> {
        self.lower
    }

    /// 线索后继
    pub fn higher(&self) -> Option<NodeId> {
        self.higher
    }

    /// 子树高度
    pub fn height(&self) -> u32 {
        self.height
    }

    /// 配对的段
    pub fn segment(&self) -> Option<SegmentId> {
        self.seg
    }
}
