//! 段 / 节点竞技场
//!
//! 竞技场在构造时一次性分配全部段和索引节点，之后容量不再增长，
//! 是同时驻留段数量的硬上限。
//!
//! # 布局
//!
//! ```text
//! segments: [ free.head, free.tail, lru.head, lru.tail, dirty.*, locked.*, seg0, seg1, ... ]
//! nodes:    [ LOWEST, HIGHEST, node0, node1, ... ]
//! ```
//!
//! 链表哨兵和线索哨兵与普通条目共用同一个竞技场，所有链接都用句柄表示，
//! 旋转和后继交换只需比较句柄，不存在所有权环。

mod node;
mod segment;

pub use node::{IndexNode, NodeId};
pub use segment::{ListKind, Segment, SegmentId, SegmentRange};

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::consts::{LIST_SENTINEL_SLOTS, THREAD_SENTINEL_SLOTS};

/// 固定容量的段 / 节点池
#[derive(Debug)]
pub struct Arena {
    segments: Vec<Segment>,
    nodes: Vec<IndexNode>,
    capacity: usize,
}

impl Arena {
    /// 创建竞技场并把每个段与一个节点永久配对
    ///
    /// # 参数
    ///
    /// * `capacity` - 可用段数量（不含哨兵）
    pub fn new(capacity: usize) -> Self {
        let mut segments = Vec::with_capacity(LIST_SENTINEL_SLOTS + capacity);
        let mut nodes = Vec::with_capacity(THREAD_SENTINEL_SLOTS + capacity);

        for _ in 0..LIST_SENTINEL_SLOTS {
            segments.push(Segment::new(None));
        }
        for _ in 0..THREAD_SENTINEL_SLOTS {
            nodes.push(IndexNode::new(None));
        }
        for i in 0..capacity {
            let seg = SegmentId(LIST_SENTINEL_SLOTS + i);
            let node = NodeId(THREAD_SENTINEL_SLOTS + i);
            segments.push(Segment::new(Some(node)));
            nodes.push(IndexNode::new(Some(seg)));
        }

        log::debug!("[ARENA] allocated {} segment/node pairs", capacity);

        Self {
            segments,
            nodes,
            capacity,
        }
    }

    /// 可用段数量
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 所有非哨兵段的句柄
    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> {
        (LIST_SENTINEL_SLOTS..LIST_SENTINEL_SLOTS + self.capacity).map(SegmentId)
    }

    /// 句柄是否指向一个真实段（而不是链表哨兵或越界值）
    pub fn is_segment(&self, seg: SegmentId) -> bool {
        seg.0 >= LIST_SENTINEL_SLOTS && seg.0 < self.segments.len()
    }

    /// 段的配对节点
    ///
    /// # Panics
    ///
    /// 对链表哨兵调用时 panic（配对关系被破坏）
    pub fn node_of(&self, seg: SegmentId) -> NodeId {
        self[seg]
            .node
            .expect("list sentinel has no paired index node")
    }

    /// 节点的配对段
    ///
    /// # Panics
    ///
    /// 对线索哨兵调用时 panic
    pub fn seg_of(&self, node: NodeId) -> SegmentId {
        self[node]
            .seg
            .expect("thread sentinel carries no segment")
    }

    /// 节点当前承载的键
    pub fn key_of(&self, node: NodeId) -> u64 {
        self[self.seg_of(node)].key
    }

    /// 交换两个节点承载的段，并修正两个段的反向链接
    ///
    /// 节点的树链接和线索链接保持不动。
    pub(crate) fn swap_segments(&mut self, a: NodeId, b: NodeId) {
        let sa = self.seg_of(a);
        let sb = self.seg_of(b);
        self[a].seg = Some(sb);
        self[b].seg = Some(sa);
        self[sa].node = Some(b);
        self[sb].node = Some(a);
        log::trace!("[ARENA] swapped payloads of nodes {} and {}", a.0, b.0);
    }
}

impl Index<SegmentId> for Arena {
    type Output = Segment;

    fn index(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }
}

impl IndexMut<SegmentId> for Arena {
    fn index_mut(&mut self, id: SegmentId) -> &mut Segment {
        &mut self.segments[id.0]
    }
}

impl Index<NodeId> for Arena {
    type Output = IndexNode;

    fn index(&self, id: NodeId) -> &IndexNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut IndexNode {
        &mut self.nodes[id.0]
    }
}
