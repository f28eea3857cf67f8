//! TAVL 查找
//!
//! floor 查找利用线索回退：向左走而左孩子为空时，直接返回该节点的线索前驱，
//! 不需要第二次遍历，也不需要记录"目前最好"的候选。

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt::Write;

use super::Tavl;
use crate::arena::{Arena, NodeId};

impl Tavl {
    /// 精确查找键为 `key` 的节点
    pub fn search_exact(&self, arena: &Arena, key: u64) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(node) = cur {
            cur = match key.cmp(&arena.key_of(node)) {
                Ordering::Equal => return Some(node),
                Ordering::Less => arena[node].left,
                Ordering::Greater => arena[node].right,
            };
        }
        None
    }

    /// floor 查找
    ///
    /// 返回键不大于 `lba` 的最大驻留节点；如果 `lba` 小于所有驻留键
    /// 或树为空，返回 [`NodeId::LOWEST`] 哨兵。
    pub fn search_floor(&self, arena: &Arena, lba: u64) -> NodeId {
        let Some(mut cur) = self.root else {
            return NodeId::LOWEST;
        };
        loop {
            match lba.cmp(&arena.key_of(cur)) {
                Ordering::Equal => return cur,
                Ordering::Less => match arena[cur].left {
                    Some(left) => cur = left,
                    None => {
                        return arena[cur]
                            .lower
                            .expect("resident node has no thread predecessor")
                    }
                },
                Ordering::Greater => match arena[cur].right {
                    Some(right) => cur = right,
                    None => return cur,
                },
            }
        }
    }

    /// 与 [`search_floor`](Self::search_floor) 相同的下降过程，并以 debug 级别
    /// 记录经过的路径：`l(h)` / `r(h)` 表示向左 / 右下降到高度为 h 的孩子。
    pub fn dump_path(&self, arena: &Arena, lba: u64) -> NodeId {
        let mut path = String::new();
        let mut cur = match self.root {
            Some(root) => root,
            None => {
                log::debug!("[TAVL] path to {:#x}: unknown key", lba);
                return NodeId::LOWEST;
            }
        };
        let found = loop {
            let node = &arena[cur];
            match lba.cmp(&arena.key_of(cur)) {
                Ordering::Equal => {
                    let seg = &arena[arena.seg_of(cur)];
                    let _ = write!(path, "({}..{})({})", seg.key, seg.end(), node.height);
                    break cur;
                }
                Ordering::Less => match node.left {
                    Some(left) => {
                        let _ = write!(path, "l({})-", arena[left].height);
                        cur = left;
                    }
                    None => {
                        path.push_str("unknown key");
                        break node.lower.expect("resident node has no thread predecessor");
                    }
                },
                Ordering::Greater => match node.right {
                    Some(right) => {
                        let _ = write!(path, "r({})-", arena[right].height);
                        cur = right;
                    }
                    None => {
                        path.push_str("unknown key");
                        break cur;
                    }
                },
            }
        };
        log::debug!("[TAVL] path to {:#x}: {}", lba, path);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tavl::tests::keyed_nodes;

    fn build(keys: &[u64]) -> (Arena, Tavl, alloc::vec::Vec<NodeId>) {
        let mut arena = Arena::new(keys.len());
        let mut tavl = Tavl::new(&mut arena);
        let nodes = keyed_nodes(&mut arena, keys);
        for &n in &nodes {
            tavl.insert(&mut arena, n);
        }
        (arena, tavl, nodes)
    }

    #[test]
    fn test_floor_on_empty_tree_is_lowest() {
        let mut arena = Arena::new(4);
        let tavl = Tavl::new(&mut arena);
        for lba in [0, 1, 1000, u64::MAX] {
            assert_eq!(tavl.search_floor(&arena, lba), NodeId::LOWEST);
        }
        assert_eq!(tavl.search_exact(&arena, 0), None);
    }

    #[test]
    fn test_search_exact() {
        let (arena, tavl, nodes) = build(&[50, 20, 80, 10, 30, 70, 90]);
        for (i, &key) in [50u64, 20, 80, 10, 30, 70, 90].iter().enumerate() {
            assert_eq!(tavl.search_exact(&arena, key), Some(nodes[i]));
        }
        assert_eq!(tavl.search_exact(&arena, 55), None);
        assert_eq!(tavl.search_exact(&arena, 0), None);
    }

    #[test]
    fn test_floor_returns_greatest_key_not_above_lba() {
        let keys = [50u64, 20, 80, 10, 30, 70, 90];
        let (arena, tavl, _) = build(&keys);

        for lba in 0..120u64 {
            let expected = keys.iter().copied().filter(|&k| k <= lba).max();
            let found = tavl.search_floor(&arena, lba);
            match expected {
                Some(k) => assert_eq!(arena.key_of(found), k, "floor of {}", lba),
                None => assert_eq!(found, NodeId::LOWEST, "floor of {}", lba),
            }
        }
    }

    #[test]
    fn test_dump_path_matches_floor() {
        let (arena, tavl, _) = build(&[40, 20, 60, 10]);
        for lba in [0u64, 10, 15, 40, 45, 99] {
            assert_eq!(tavl.dump_path(&arena, lba), tavl.search_floor(&arena, lba));
        }
    }
}
