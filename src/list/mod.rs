//! 成员链表
//!
//! 带 head/tail 哨兵的侵入式双向链表，节点就是竞技场中的段。
//! 空闲池、LRU、dirty、locked 四个链表共用同一套原语。
//!
//! [`unlink`] 只依赖段自身的 `prev` / `next`，不需要知道段在哪个链表上；
//! 段上的 `list` 标记只用于诊断和长度计数，不参与链接。

use crate::arena::{Arena, ListKind, SegmentId};
use crate::consts::{LIST_COUNT, SENTINELS_PER_LIST};

/// 单个成员链表
#[derive(Debug, Clone)]
pub struct SegList {
    kind: ListKind,
    head: SegmentId,
    tail: SegmentId,
    len: usize,
}

impl SegList {
    /// 初始化链表：链接该类别保留的 head/tail 哨兵
    pub(crate) fn new(kind: ListKind, arena: &mut Arena) -> Self {
        let head = SegmentId(kind.slot() * SENTINELS_PER_LIST);
        let tail = SegmentId(kind.slot() * SENTINELS_PER_LIST + 1);
        arena[head].next = Some(tail);
        arena[head].prev = None;
        arena[tail].prev = Some(head);
        arena[tail].next = None;
        Self {
            kind,
            head,
            tail,
            len: 0,
        }
    }

    /// 链表类别
    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// 链表长度
    pub fn len(&self) -> usize {
        self.len
    }

    /// 链表是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 第一个段（不摘除）
    pub fn front(&self, arena: &Arena) -> Option<SegmentId> {
        let first = arena[self.head].next?;
        (first != self.tail).then_some(first)
    }

    /// 追加一个已脱离任何链表的段到尾部
    pub(crate) fn push_back(&mut self, arena: &mut Arena, seg: SegmentId) {
        debug_assert!(
            !arena[seg].is_linked(),
            "segment is already linked into a list"
        );
        let prev = arena[self.tail]
            .prev
            .expect("list tail sentinel lost its predecessor");
        arena[prev].next = Some(seg);
        arena[seg].prev = Some(prev);
        arena[seg].next = Some(self.tail);
        arena[self.tail].prev = Some(seg);
        arena[seg].list = Some(self.kind);
        self.len += 1;
        log::trace!("[LIST] push {:?} <- segment {}", self.kind, seg.0);
    }

    /// 摘除并返回头部段；链表为空时返回 None
    pub(crate) fn pop_front(&mut self, arena: &mut Arena) -> Option<SegmentId> {
        let seg = self.front(arena)?;
        unlink(arena, seg);
        self.len -= 1;
        log::trace!("[LIST] pop {:?} -> segment {}", self.kind, seg.0);
        Some(seg)
    }

    /// 从头到尾遍历链表
    pub fn iter<'a>(&self, arena: &'a Arena) -> ListIter<'a> {
        ListIter {
            arena,
            cur: arena[self.head].next,
            tail: self.tail,
        }
    }
}

/// 把段从当前所在链表中摘除，返回它原来所在链表的类别
///
/// # Panics
///
/// 段未链接到任何链表时 panic。
pub(crate) fn unlink(arena: &mut Arena, seg: SegmentId) -> Option<ListKind> {
    let prev = arena[seg].prev.expect("unlinking a segment that is not on any list");
    let next = arena[seg].next.expect("unlinking a segment that is not on any list");
    arena[prev].next = Some(next);
    arena[next].prev = Some(prev);
    let s = &mut arena[seg];
    s.prev = None;
    s.next = None;
    s.list.take()
}

/// 四个成员链表的集合
#[derive(Debug, Clone)]
pub struct Lists {
    lists: [SegList; LIST_COUNT],
}

impl Lists {
    /// 初始化四个空链表，并把竞技场中的全部段放入空闲池
    pub(crate) fn new(arena: &mut Arena) -> Self {
        let mut lists = ListKind::ALL.map(|kind| SegList::new(kind, arena));
        let ids: alloc::vec::Vec<SegmentId> = arena.segment_ids().collect();
        for seg in ids {
            lists[ListKind::Free.slot()].push_back(arena, seg);
        }
        Self { lists }
    }

    /// 获取指定类别的链表
    pub fn get(&self, kind: ListKind) -> &SegList {
        &self.lists[kind.slot()]
    }

    pub(crate) fn get_mut(&mut self, kind: ListKind) -> &mut SegList {
        &mut self.lists[kind.slot()]
    }

    /// 把段追加到指定链表尾部
    pub(crate) fn push_back(&mut self, arena: &mut Arena, kind: ListKind, seg: SegmentId) {
        self.get_mut(kind).push_back(arena, seg);
    }

    /// 摘除指定链表的头部段
    pub(crate) fn pop_front(&mut self, arena: &mut Arena, kind: ListKind) -> Option<SegmentId> {
        self.get_mut(kind).pop_front(arena)
    }

    /// 与链表无关地摘除段，并更新原链表的长度
    pub(crate) fn detach(&mut self, arena: &mut Arena, seg: SegmentId) -> Option<ListKind> {
        let kind = unlink(arena, seg);
        if let Some(kind) = kind {
            self.get_mut(kind).len -= 1;
        }
        kind
    }

    /// 所有链表长度之和
    pub fn total_len(&self) -> usize {
        self.lists.iter().map(SegList::len).sum()
    }
}

/// 成员链表迭代器
pub struct ListIter<'a> {
    arena: &'a Arena,
    cur: Option<SegmentId>,
    tail: SegmentId,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = SegmentId;

    fn next(&mut self) -> Option<SegmentId> {
        let cur = self.cur?;
        if cur == self.tail {
            self.cur = None;
            return None;
        }
        self.cur = self.arena[cur].next;
        Some(cur)
    }
}
