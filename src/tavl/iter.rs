//! 线索遍历

use crate::arena::{Arena, NodeId, SegmentRange};

/// 沿线索按 LBA 升序遍历驻留段
pub struct ThreadIter<'a> {
    arena: &'a Arena,
    cur: NodeId,
}

impl<'a> ThreadIter<'a> {
    pub(crate) fn new(arena: &'a Arena) -> Self {
        let cur = arena[NodeId::LOWEST].higher.unwrap_or(NodeId::HIGHEST);
        Self { arena, cur }
    }
}

impl<'a> Iterator for ThreadIter<'a> {
    type Item = SegmentRange;

    fn next(&mut self) -> Option<SegmentRange> {
        if self.cur == NodeId::HIGHEST {
            return None;
        }
        let node = &self.arena[self.cur];
        let seg = self.arena.seg_of(self.cur);
        let s = &self.arena[seg];
        self.cur = node.higher.unwrap_or(NodeId::HIGHEST);
        Some(SegmentRange {
            id: seg,
            key: s.key,
            blocks: s.blocks,
        })
    }
}
