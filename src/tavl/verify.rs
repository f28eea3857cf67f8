//! TAVL 完整性验证
//!
//! 只读遍历树和线索，检查：
//! - 线索按键升序且相邻范围互不重叠
//! - 段与节点的双向配对
//! - 线索上的每个节点都能通过独立的树查找找到
//! - 线索长度等于驻留计数
//! - 每个节点的高度与平衡因子
//!
//! 这些检查供测试和偏执模式使用，不参与正常控制流。

use super::Tavl;
use crate::arena::{Arena, NodeId};

/// TAVL 完整性检查错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckError {
    /// 线索链接缺失或前后链接不对称
    ThreadBroken,
    /// 线索顺序错误或相邻范围重叠
    Overlap,
    /// 段与节点的反向链接不一致
    PairingMismatch,
    /// 线索上的节点无法通过树查找找到
    MissingFromTree,
    /// 线索长度与驻留计数不一致
    CountMismatch,
    /// 节点高度与孩子高度不一致
    HeightMismatch,
    /// 平衡因子超出 [-1, 1]
    Unbalanced,
    /// 成员链表链接或计数错误
    ListMismatch,
}

impl CheckError {
    /// 获取错误描述
    pub fn message(&self) -> &'static str {
        match self {
            Self::ThreadBroken => "thread link missing or asymmetric",
            Self::Overlap => "thread out of order or ranges overlap",
            Self::PairingMismatch => "segment/node back-link mismatch",
            Self::MissingFromTree => "thread node not reachable through the tree",
            Self::CountMismatch => "thread length differs from active node count",
            Self::HeightMismatch => "node height inconsistent with children",
            Self::Unbalanced => "balance factor out of range",
            Self::ListMismatch => "membership list links or counts inconsistent",
        }
    }
}

impl core::fmt::Display for CheckError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

/// 沿线索检查顺序、无重叠、配对和计数
pub fn check_ordering(tavl: &Tavl, arena: &Arena) -> Result<(), CheckError> {
    let mut prev = NodeId::LOWEST;
    let mut cur = arena[NodeId::LOWEST].higher.ok_or(CheckError::ThreadBroken)?;
    let mut prev_end = 0u64;
    let mut count = 0usize;

    while cur != NodeId::HIGHEST {
        if arena[cur].lower != Some(prev) {
            log::error!("[TAVL] node {} lower link does not point back to {}", cur.0, prev.0);
            return Err(CheckError::ThreadBroken);
        }
        let seg = arena[cur].seg.ok_or(CheckError::ThreadBroken)?;
        let s = &arena[seg];

        if s.key < prev_end {
            log::error!(
                "[TAVL] range [{:#x}..{:#x}) starts before previous end {:#x}",
                s.key,
                s.end(),
                prev_end
            );
            return Err(CheckError::Overlap);
        }
        if s.node != Some(cur) {
            log::error!("[TAVL] segment {} does not point back to node {}", seg.0, cur.0);
            return Err(CheckError::PairingMismatch);
        }
        if tavl.search_exact(arena, s.key) != Some(cur) {
            log::error!("[TAVL] could not find key {:#x} through the tree", s.key);
            return Err(CheckError::MissingFromTree);
        }

        count += 1;
        if count > tavl.active_nodes() {
            return Err(CheckError::CountMismatch);
        }
        prev_end = s.end();
        prev = cur;
        cur = arena[cur].higher.ok_or(CheckError::ThreadBroken)?;
    }

    if arena[NodeId::HIGHEST].lower != Some(prev) {
        return Err(CheckError::ThreadBroken);
    }
    if count != tavl.active_nodes() {
        log::error!(
            "[TAVL] walked {} nodes but active_nodes is {}",
            count,
            tavl.active_nodes()
        );
        return Err(CheckError::CountMismatch);
    }
    Ok(())
}

/// 递归检查子树的高度与平衡，成功时返回子树高度
pub fn check_balance(arena: &Arena, node: Option<NodeId>) -> Result<u32, CheckError> {
    let Some(node) = node else {
        return Ok(0);
    };
    let n = &arena[node];
    let lh = check_balance(arena, n.left)?;
    let rh = check_balance(arena, n.right)?;

    if n.height != 1 + lh.max(rh) {
        log::error!(
            "[TAVL] node {} height {} but children are {} / {}",
            node.0,
            n.height,
            lh,
            rh
        );
        return Err(CheckError::HeightMismatch);
    }
    if lh.abs_diff(rh) > 1 {
        log::error!("[TAVL] node {} unbalanced: left {} right {}", node.0, lh, rh);
        return Err(CheckError::Unbalanced);
    }
    Ok(n.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tavl::tests::keyed_nodes;

    fn build(keys: &[u64]) -> (Arena, Tavl) {
        let mut arena = Arena::new(keys.len());
        let mut tavl = Tavl::new(&mut arena);
        for n in keyed_nodes(&mut arena, keys) {
            tavl.insert(&mut arena, n);
        }
        (arena, tavl)
    }

    #[test]
    fn test_empty_tree_is_sane() {
        let (arena, tavl) = build(&[]);
        check_ordering(&tavl, &arena).unwrap();
        assert_eq!(check_balance(&arena, tavl.root()), Ok(0));
    }

    #[test]
    fn test_detects_overlap() {
        let (mut arena, tavl) = build(&[10, 20, 30]);
        let seg = arena.seg_of(tavl.search_exact(&arena, 10).unwrap());
        arena[seg].blocks = 15;
        assert_eq!(check_ordering(&tavl, &arena), Err(CheckError::Overlap));
    }

    #[test]
    fn test_detects_count_mismatch() {
        let (arena, mut tavl) = build(&[10, 20]);
        tavl.active_nodes += 1;
        assert_eq!(check_ordering(&tavl, &arena), Err(CheckError::CountMismatch));
    }

    #[test]
    fn test_detects_pairing_mismatch() {
        let (mut arena, tavl) = build(&[10, 20]);
        let node = tavl.search_exact(&arena, 20).unwrap();
        let seg = arena.seg_of(node);
        arena[seg].node = None;
        assert_eq!(check_ordering(&tavl, &arena), Err(CheckError::PairingMismatch));
    }

    #[test]
    fn test_detects_bad_height() {
        let (mut arena, tavl) = build(&[10, 20, 30]);
        let root = tavl.root().unwrap();
        arena[root].height = 5;
        assert_eq!(check_balance(&arena, tavl.root()), Err(CheckError::HeightMismatch));
    }

    #[test]
    fn test_detects_unbalanced_subtree() {
        let (mut arena, tavl) = build(&[20, 10, 30, 40]);
        let root = tavl.root().unwrap();
        // 剪掉左孩子并同步高度，使右侧高出 2
        arena[root].left = None;
        arena[root].height = 3;
        assert_eq!(check_balance(&arena, tavl.root()), Err(CheckError::Unbalanced));
    }
}
