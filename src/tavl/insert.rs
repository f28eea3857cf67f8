//! TAVL 插入
//!
//! 新节点总是作为某个父节点 `p` 的左/右孩子挂入，此时它在有序序列中
//! 恰好紧邻 `p`，因此线索更新只需在 `p` 之前/之后拼接一次。

use core::cmp::Ordering;

use super::{balance_factor, rotate_left, rotate_right, thread, update_height, Tavl};
use crate::arena::{Arena, NodeId};

impl Tavl {
    /// 把节点插入树和线索
    ///
    /// # Panics
    ///
    /// 键已存在时 panic：调用者必须先驱逐所有重叠段（包括同键段）。
    pub fn insert(&mut self, arena: &mut Arena, node: NodeId) {
        debug_assert!(arena[node].is_detached(), "inserting a node that is still linked");
        let key = arena.key_of(node);

        match self.root {
            None => {
                arena[NodeId::LOWEST].higher = Some(node);
                arena[node].lower = Some(NodeId::LOWEST);
                arena[NodeId::HIGHEST].lower = Some(node);
                arena[node].higher = Some(NodeId::HIGHEST);
                self.root = Some(node);
            }
            Some(root) => {
                self.root = Some(insert_at(arena, root, node, key));
            }
        }
        self.active_nodes += 1;
        log::trace!("[TAVL] inserted key {:#x}, active={}", key, self.active_nodes);
    }
}

/// 在以 `head` 为根的非空子树中插入 `node`，返回子树新根
fn insert_at(arena: &mut Arena, head: NodeId, node: NodeId, key: u64) -> NodeId {
    match key.cmp(&arena.key_of(head)) {
        Ordering::Less => match arena[head].left {
            None => {
                thread::insert_before(arena, node, head);
                arena[head].left = Some(node);
            }
            Some(left) => {
                let new_left = insert_at(arena, left, node, key);
                arena[head].left = Some(new_left);
            }
        },
        Ordering::Greater => match arena[head].right {
            None => {
                thread::insert_after(arena, node, head);
                arena[head].right = Some(node);
            }
            Some(right) => {
                let new_right = insert_at(arena, right, node, key);
                arena[head].right = Some(new_right);
            }
        },
        Ordering::Equal => {
            log::error!("[TAVL] duplicate key {:#x} reached the range index", key);
            panic!("duplicate key inserted into range index");
        }
    }
    rebalance(arena, head, key)
}

/// 插入路径上的重平衡：按新键落在哪一侧选择 LL/LR/RR/RL
fn rebalance(arena: &mut Arena, head: NodeId, key: u64) -> NodeId {
    update_height(arena, head);
    let bal = balance_factor(arena, head);
    if bal > 1 {
        let left = arena[head].left.expect("left-heavy node has a left child");
        if key < arena.key_of(left) {
            rotate_right(arena, head)
        } else {
            let new_left = rotate_left(arena, left);
            arena[head].left = Some(new_left);
            rotate_right(arena, head)
        }
    } else if bal < -1 {
        let right = arena[head].right.expect("right-heavy node has a right child");
        if key > arena.key_of(right) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tavl::tests::keyed_nodes;
    use crate::tavl::{check_balance, check_ordering};
    use alloc::vec::Vec;

    fn insert_all(keys: &[u64]) -> (Arena, Tavl) {
        let mut arena = Arena::new(keys.len());
        let mut tavl = Tavl::new(&mut arena);
        for n in keyed_nodes(&mut arena, keys) {
            tavl.insert(&mut arena, n);
        }
        (arena, tavl)
    }

    #[test]
    fn test_first_insert_links_sentinels() {
        let (arena, tavl) = insert_all(&[42]);
        let root = tavl.root().unwrap();
        assert_eq!(tavl.active_nodes(), 1);
        assert_eq!(arena[NodeId::LOWEST].higher(), Some(root));
        assert_eq!(arena[NodeId::HIGHEST].lower(), Some(root));
        assert_eq!(arena[root].lower(), Some(NodeId::LOWEST));
        assert_eq!(arena[root].higher(), Some(NodeId::HIGHEST));
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let keys: Vec<u64> = (0..64).map(|i| i * 10).collect();
        let (arena, tavl) = insert_all(&keys);

        assert_eq!(tavl.active_nodes(), 64);
        check_balance(&arena, tavl.root()).unwrap();
        check_ordering(&tavl, &arena).unwrap();
        // 64 个节点的 AVL 树高度为 7
        assert_eq!(arena[tavl.root().unwrap()].height(), 7);
    }

    #[test]
    fn test_double_rotation_cases() {
        // LR
        let (arena, tavl) = insert_all(&[30, 10, 20]);
        assert_eq!(arena.key_of(tavl.root().unwrap()), 20);
        check_balance(&arena, tavl.root()).unwrap();

        // RL
        let (arena, tavl) = insert_all(&[10, 30, 20]);
        assert_eq!(arena.key_of(tavl.root().unwrap()), 20);
        check_balance(&arena, tavl.root()).unwrap();
    }

    #[test]
    fn test_thread_is_sorted_after_mixed_inserts() {
        let keys = [500u64, 100, 900, 300, 700, 200, 800, 50, 950, 400];
        let (arena, tavl) = insert_all(&keys);

        let walked: Vec<u64> = tavl.iter(&arena).map(|r| r.key).collect();
        let mut sorted = keys.to_vec();
        sorted.sort_unstable();
        assert_eq!(walked, sorted);
    }

    #[test]
    #[should_panic(expected = "duplicate key")]
    fn test_duplicate_key_panics() {
        insert_all(&[10, 20, 10]);
    }
}
