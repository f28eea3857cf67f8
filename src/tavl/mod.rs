//! TAVL：带线索的 AVL 范围索引
//!
//! 以段的起始 LBA 为键的自平衡二叉搜索树，同时在所有驻留节点之间维护一条
//! 按 LBA 升序的双向线索链表。
//!
//! # 主要组件
//!
//! - [`Tavl`] - 树根与驻留节点计数
//! - 查找：精确查找、floor 查找（`search.rs`）
//! - 插入：O(1) 线索拼接 + AVL 重平衡（`insert.rs`）
//! - 删除：双孩子情况用线索后继交换段载荷（`remove.rs`）
//! - 校验：线索顺序 / 配对 / 高度 / 平衡检查（`verify.rs`）
//!
//! # 不变量
//!
//! - 左子树所有键 < 节点键 < 右子树所有键
//! - 从 `LOWEST.higher` 走到 `HIGHEST` 按升序经过全部驻留节点，等于中序遍历
//! - 每个节点左右子树高度差不超过 1，`height = 1 + max(左, 右)`
//!
//! 旋转只修改 `left` / `right` / `height`，不触碰线索：旋转保持中序序列不变。

mod insert;
mod iter;
mod remove;
mod search;
mod thread;
mod verify;

pub use iter::ThreadIter;
pub use verify::{check_balance, check_ordering, CheckError};

use crate::arena::{Arena, NodeId};

/// 带线索的 AVL 树
#[derive(Debug, Clone)]
pub struct Tavl {
    root: Option<NodeId>,
    active_nodes: usize,
}

impl Tavl {
    /// 创建空树，并把两个线索哨兵互相链接
    pub fn new(arena: &mut Arena) -> Self {
        thread::reset_sentinels(arena);
        Self {
            root: None,
            active_nodes: 0,
        }
    }

    /// 树根
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// 驻留节点数量
    pub fn active_nodes(&self) -> usize {
        self.active_nodes
    }

    /// 树是否为空
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// 记录一次删除
    ///
    /// 删除原语本身不修改计数，由调用者在驱逐时递减。
    pub(crate) fn note_removed(&mut self) {
        self.active_nodes = self
            .active_nodes
            .checked_sub(1)
            .expect("active node count underflow");
    }

    /// 按 LBA 升序遍历驻留节点
    pub fn iter<'a>(&self, arena: &'a Arena) -> ThreadIter<'a> {
        ThreadIter::new(arena)
    }
}

/// 子树高度，空子树为 0
#[inline]
pub(crate) fn height(arena: &Arena, node: Option<NodeId>) -> u32 {
    node.map_or(0, |n| arena[n].height)
}

/// 根据孩子重新计算高度
#[inline]
fn update_height(arena: &mut Arena, node: NodeId) {
    let h = 1 + height(arena, arena[node].left).max(height(arena, arena[node].right));
    arena[node].height = h;
}

/// 平衡因子：左高 - 右高
#[inline]
fn balance_factor(arena: &Arena, node: NodeId) -> i64 {
    height(arena, arena[node].left) as i64 - height(arena, arena[node].right) as i64
}

/// 右旋（顺时针），返回子树新根
fn rotate_right(arena: &mut Arena, head: NodeId) -> NodeId {
    let new_head = arena[head].left.expect("rotate right expects left child");
    arena[head].left = arena[new_head].right;
    arena[new_head].right = Some(head);
    update_height(arena, head);
    update_height(arena, new_head);
    new_head
}

/// 左旋（逆时针），返回子树新根
fn rotate_left(arena: &mut Arena, head: NodeId) -> NodeId {
    let new_head = arena[head].right.expect("rotate left expects right child");
    arena[head].right = arena[new_head].left;
    arena[new_head].left = Some(head);
    update_height(arena, head);
    update_height(arena, new_head);
    new_head
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::SegmentId;
    use alloc::vec::Vec;

    /// 为测试准备一组带键的节点
    pub(crate) fn keyed_nodes(arena: &mut Arena, keys: &[u64]) -> Vec<NodeId> {
        let ids: Vec<SegmentId> = arena.segment_ids().collect();
        keys.iter()
            .zip(ids)
            .map(|(&key, seg)| {
                arena[seg].key = key;
                arena[seg].blocks = 1;
                arena.node_of(seg)
            })
            .collect()
    }

    #[test]
    fn test_rotations_preserve_inorder() {
        let mut arena = Arena::new(3);
        let mut tavl = Tavl::new(&mut arena);
        let nodes = keyed_nodes(&mut arena, &[10, 20, 30]);

        // 升序插入触发一次左旋
        for &n in &nodes {
            tavl.insert(&mut arena, n);
        }
        let root = tavl.root().unwrap();
        assert_eq!(arena.key_of(root), 20);
        assert_eq!(arena[root].height(), 2);

        let new_root = rotate_right(&mut arena, root);
        assert_eq!(arena.key_of(new_root), 10);
        assert_eq!(arena[new_root].height(), 3);
        let back = rotate_left(&mut arena, new_root);
        assert_eq!(back, root);
        assert_eq!(arena[root].height(), 2);

        let keys: Vec<u64> = tavl.iter(&arena).map(|r| r.key).collect();
        assert_eq!(keys, [10, 20, 30]);
    }

    #[test]
    fn test_height_of_empty_subtree() {
        let arena = Arena::new(1);
        assert_eq!(height(&arena, None), 0);
    }
}
