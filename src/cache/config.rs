//! 范围缓存配置与统计

use bitflags::bitflags;

use crate::consts::DEFAULT_SEGMENT_COUNT;

/// 范围缓存配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// 段池容量（同时驻留段数量上限）
    pub capacity: usize,
    /// 偏执模式：每次修改后执行完整校验，失败即 panic
    pub paranoid: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_SEGMENT_COUNT,
            paranoid: false,
        }
    }
}

bitflags! {
    /// 完整性校验范围
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CheckFlags: u8 {
        /// 线索顺序、无重叠、树可达、驻留计数
        const ORDERING = 0x01;
        /// 高度与平衡因子
        const BALANCE  = 0x02;
        /// 全部段与节点的双向配对
        const PAIRING  = 0x04;
        /// 成员链表链接、标记与计数
        const LISTS    = 0x08;
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// 成功插入的范围数量
    pub inserts: u64,
    /// 驱逐总次数（包括重叠驱逐）
    pub evictions: u64,
    /// 因重叠而被驱逐的段数量
    pub overlap_evictions: u64,
    /// 因空闲池耗尽而失败的插入次数
    pub exhausted: u64,
}
