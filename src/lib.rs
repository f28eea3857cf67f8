//! lba_range_cache: 块设备 LBA 范围缓存索引
//!
//! 跟踪块设备上哪些逻辑块范围当前驻留在缓存中，以起始 LBA 和块数量为键。
//! 提供：
//! - **floor 查找**：覆盖或紧邻给定地址之前的缓存范围
//! - **一致性插入**：插入新范围时自动驱逐所有与之重叠的旧范围
//! - **按需驱逐**
//!
//! 全部操作为对数时间，所有条目来自一次性分配的固定大小段池。
//!
//! # 示例
//!
//! ```rust
//! use lba_range_cache::RangeCache;
//!
//! let mut cache = RangeCache::new(4);
//! cache.insert_range(0, 10).unwrap();
//! cache.insert_range(20, 10).unwrap();
//! cache.insert_range(40, 10).unwrap();
//!
//! // [5, 45) 覆盖全部三个范围
//! cache.insert_range(5, 40).unwrap();
//! let spans: Vec<_> = cache.iter().map(|r| (r.key, r.end())).collect();
//! assert_eq!(spans, [(5, 45)]);
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`consts`] - 常量定义
//! - [`arena`] - 段 / 节点竞技场
//! - [`list`] - 侵入式成员链表
//! - [`tavl`] - 带线索的 AVL 范围索引
//! - [`cache`] - 一致性管理 API

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 常量定义
pub mod consts;

/// 段 / 节点竞技场
pub mod arena;

/// 成员链表
pub mod list;

/// TAVL 范围索引
pub mod tavl;

/// 范围缓存
pub mod cache;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 竞技场
pub use arena::{ListKind, NodeId, SegmentId, SegmentRange};

// 范围索引
pub use tavl::{CheckError, Tavl};

// 范围缓存
pub use cache::{CacheConfig, CacheStats, CheckFlags, Floor, RangeCache};

// 常量
pub use consts::DEFAULT_SEGMENT_COUNT;
