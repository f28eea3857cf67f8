//! 范围缓存完整性校验
//!
//! 在 TAVL 检查之外，再核对段池守恒、配对关系和成员链表。
//! 任何失败都说明索引自身存在 bug，[`RangeCache::assert_sane`] 会直接 panic。

use super::{config::CheckFlags, range_cache::RangeCache};
use crate::{
    arena::ListKind,
    error::Result,
    tavl::{self, CheckError},
};

impl RangeCache {
    /// 沿线索检查顺序、无重叠、配对、树可达和驻留计数
    pub fn check_ordering(&self) -> core::result::Result<(), CheckError> {
        tavl::check_ordering(&self.tavl, &self.arena)
    }

    /// 检查所有节点的高度和平衡因子
    pub fn check_balance(&self) -> core::result::Result<(), CheckError> {
        tavl::check_balance(&self.arena, self.tavl.root()).map(|_| ())
    }

    /// 检查全部段与节点的双向配对
    pub fn check_pairing(&self) -> core::result::Result<(), CheckError> {
        for seg in self.arena.segment_ids() {
            let node = self.arena[seg].node.ok_or(CheckError::PairingMismatch)?;
            if self.arena[node].seg != Some(seg) {
                log::error!("[RCACHE] segment {} / node {} pairing broken", seg.index(), node.index());
                return Err(CheckError::PairingMismatch);
            }
        }
        Ok(())
    }

    /// 检查成员链表：链接对称、标记一致、计数正确、段池守恒
    pub fn check_lists(&self) -> core::result::Result<(), CheckError> {
        let mut active_members = 0usize;
        let mut total = 0usize;

        for kind in ListKind::ALL {
            let mut count = 0usize;
            for seg in self.list_iter(kind) {
                count += 1;
                if count > self.capacity() {
                    log::error!("[RCACHE] {:?} list longer than the pool, cycle suspected", kind);
                    return Err(CheckError::ListMismatch);
                }
                let s = &self.arena[seg];
                if s.list != Some(kind) {
                    log::error!(
                        "[RCACHE] segment {} found on {:?} but tagged {:?}",
                        seg.index(),
                        kind,
                        s.list
                    );
                    return Err(CheckError::ListMismatch);
                }
                let next = s.next.ok_or(CheckError::ListMismatch)?;
                if self.arena[next].prev != Some(seg) {
                    return Err(CheckError::ListMismatch);
                }
                // 活跃链表上的段必须驻留，空闲段必须完全脱离树和线索
                let node = self.arena.node_of(seg);
                let threaded = self.arena[node].lower.is_some();
                if threaded != kind.is_active() {
                    log::error!(
                        "[RCACHE] segment {} on {:?} has threaded={}",
                        seg.index(),
                        kind,
                        threaded
                    );
                    return Err(CheckError::ListMismatch);
                }
            }
            if count != self.list_len(kind) {
                return Err(CheckError::ListMismatch);
            }
            if kind.is_active() {
                active_members += count;
            }
            total += count;
        }

        if total != self.capacity() {
            log::error!("[RCACHE] lists hold {} segments, pool has {}", total, self.capacity());
            return Err(CheckError::ListMismatch);
        }
        if active_members != self.active_count() {
            return Err(CheckError::CountMismatch);
        }
        Ok(())
    }

    /// 按标志执行校验
    pub fn verify(&self, flags: CheckFlags) -> Result<()> {
        if flags.contains(CheckFlags::ORDERING) {
            self.check_ordering()?;
        }
        if flags.contains(CheckFlags::BALANCE) {
            self.check_balance()?;
        }
        if flags.contains(CheckFlags::PAIRING) {
            self.check_pairing()?;
        }
        if flags.contains(CheckFlags::LISTS) {
            self.check_lists()?;
        }
        Ok(())
    }

    /// 执行全部校验，失败即 panic
    ///
    /// 不变量被破坏意味着索引状态已不可信，不能继续运行。
    pub fn assert_sane(&self) {
        if let Err(err) = self.verify(CheckFlags::all()) {
            log::error!("[RCACHE] integrity check failed: {}", err);
            panic!("range cache integrity check failed: {}", err.message());
        }
    }
}
