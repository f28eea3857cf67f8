//! TAVL 删除
//!
//! 被删除的实体是段而不是节点：目标节点有两个孩子时，与线索后继交换段载荷，
//! 再从右子树删除改名后的目标（后继没有左孩子，递归必然落到单孩子情况）。
//! 交换后线索上各位置的段仍然有序，两个节点的树链接都不移动。

use core::cmp::Ordering;

use super::{balance_factor, height, rotate_left, rotate_right, thread, update_height, Tavl};
use crate::arena::{Arena, NodeId, SegmentId};

impl Tavl {
    /// 从树和线索中删除段
    ///
    /// 删除后段可能已与另一个节点配对。驻留计数由调用者递减。
    ///
    /// # Panics
    ///
    /// 段不在树中时 panic。
    pub fn remove(&mut self, arena: &mut Arena, seg: SegmentId) {
        let key = arena[seg].key;
        self.root = remove_at(arena, self.root, key);
        log::trace!("[TAVL] removed key {:#x}", key);
    }
}

fn remove_at(arena: &mut Arena, head: Option<NodeId>, key: u64) -> Option<NodeId> {
    let Some(head) = head else {
        log::error!("[TAVL] key {:#x} is not resident in the range index", key);
        panic!("removing a key that is not resident in the range index");
    };

    let head = match key.cmp(&arena.key_of(head)) {
        Ordering::Less => {
            let left = arena[head].left;
            arena[head].left = remove_at(arena, left, key);
            Some(head)
        }
        Ordering::Greater => {
            let right = arena[head].right;
            arena[head].right = remove_at(arena, right, key);
            Some(head)
        }
        Ordering::Equal => match (arena[head].left, arena[head].right) {
            (left, None) => {
                thread::remove_from_thread(arena, head);
                arena[head].reset_tree_links();
                left
            }
            (None, right) => {
                thread::remove_from_thread(arena, head);
                arena[head].reset_tree_links();
                right
            }
            (Some(_), Some(right)) => {
                let succ = arena[head]
                    .higher
                    .expect("two-child node has a thread successor");
                arena.swap_segments(head, succ);
                arena[head].right = remove_at(arena, Some(right), key);
                Some(head)
            }
        },
    };

    head.map(|h| rebalance(arena, h))
}

/// 删除路径上的重平衡：被删键已不存在，按孙子高度选择单旋或双旋
fn rebalance(arena: &mut Arena, head: NodeId) -> NodeId {
    update_height(arena, head);
    let bal = balance_factor(arena, head);
    if bal > 1 {
        let left = arena[head].left.expect("left-heavy node has a left child");
        if height(arena, arena[left].left) >= height(arena, arena[left].right) {
            rotate_right(arena, head)
        } else {
            let new_left = rotate_left(arena, left);
            arena[head].left = Some(new_left);
            rotate_right(arena, head)
        }
    } else if bal < -1 {
        let right = arena[head].right.expect("right-heavy node has a right child");
        if height(arena, arena[right].right) >= height(arena, arena[right].left) {
            rotate_left(arena, head)
        } else {
            let new_right = rotate_right(arena, right);
            arena[head].right = Some(new_right);
            rotate_left(arena, head)
        }
    } else {
        head
    }
}
