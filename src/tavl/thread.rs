//! 线索链表操作
//!
//! 线索把所有驻留节点按 key 升序串起来，两端由 `LOWEST` / `HIGHEST` 哨兵封闭，
//! 使前驱/后继查询为 O(1)。旋转不会改变中序序列，因此这里的链接只在
//! 插入和摘除节点时修改。

use crate::arena::{Arena, NodeId};

/// 把节点从线索中摘除
pub(crate) fn remove_from_thread(arena: &mut Arena, node: NodeId) {
    let lower = arena[node].lower.expect("resident node has no thread predecessor");
    let higher = arena[node].higher.expect("resident node has no thread successor");
    arena[lower].higher = Some(higher);
    arena[higher].lower = Some(lower);
    arena[node].lower = None;
    arena[node].higher = None;
}

/// 把 `node` 插入到 `target` 之前
pub(crate) fn insert_before(arena: &mut Arena, node: NodeId, target: NodeId) {
    let lower = arena[target].lower.expect("thread target has no predecessor");
    arena[lower].higher = Some(node);
    arena[target].lower = Some(node);
    arena[node].lower = Some(lower);
    arena[node].higher = Some(target);
}

/// 把 `node` 插入到 `target` 之后
pub(crate) fn insert_after(arena: &mut Arena, node: NodeId, target: NodeId) {
    let higher = arena[target].higher.expect("thread target has no successor");
    arena[higher].lower = Some(node);
    arena[target].higher = Some(node);
    arena[node].lower = Some(target);
    arena[node].higher = Some(higher);
}

/// 链接两个线索哨兵，得到空线索
pub(crate) fn reset_sentinels(arena: &mut Arena) {
    arena[NodeId::LOWEST].lower = None;
    arena[NodeId::LOWEST].higher = Some(NodeId::HIGHEST);
    arena[NodeId::HIGHEST].lower = Some(NodeId::LOWEST);
    arena[NodeId::HIGHEST].higher = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn walk(arena: &Arena) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = arena[NodeId::LOWEST].higher.unwrap();
        while cur != NodeId::HIGHEST {
            out.push(cur);
            cur = arena[cur].higher.unwrap();
        }
        out
    }

    #[test]
    fn test_splice_and_remove() {
        let mut arena = Arena::new(3);
        reset_sentinels(&mut arena);
        let nodes: Vec<NodeId> = arena.segment_ids().map(|s| arena.node_of(s)).collect();

        insert_after(&mut arena, nodes[1], NodeId::LOWEST);
        insert_before(&mut arena, nodes[0], nodes[1]);
        insert_after(&mut arena, nodes[2], nodes[1]);
        assert_eq!(walk(&arena), nodes);
        assert_eq!(arena[NodeId::HIGHEST].lower, Some(nodes[2]));

        remove_from_thread(&mut arena, nodes[1]);
        assert_eq!(walk(&arena), [nodes[0], nodes[2]]);
        assert!(arena[nodes[1]].is_detached());
        assert_eq!(arena[nodes[2]].lower, Some(nodes[0]));
    }
}
