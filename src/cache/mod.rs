//! 范围缓存模块
//!
//! 在 TAVL 范围索引之上提供对外使用的一致性管理 API。
//!
//! # 主要组件
//!
//! - [`RangeCache`] - 带重叠驱逐的插入、驱逐、查找
//! - [`CacheConfig`] - 容量与偏执模式
//! - [`CacheStats`] - 插入 / 驱逐统计
//! - [`CheckFlags`] - 完整性校验范围
//!
//! # 使用示例
//!
//! ```rust
//! use lba_range_cache::{RangeCache, Floor, ErrorKind};
//!
//! let mut cache = RangeCache::new(2);
//! let a = cache.insert_range(100, 10).unwrap();
//!
//! // 与 [100, 110) 重叠，旧段被整段驱逐
//! let b = cache.insert_range(105, 20).unwrap();
//! assert!(!cache.is_resident(a));
//! assert_eq!(cache.search_floor(110), Floor::Segment(b));
//!
//! // 池满时插入失败，调用者需要先驱逐
//! cache.insert_range(500, 1).unwrap();
//! let err = cache.insert_range(600, 1).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NoSpace);
//! cache.evict_lru().unwrap();
//! cache.insert_range(600, 1).unwrap();
//! ```
//!
//! # 性能特性
//!
//! - **查找**: O(log n)
//! - **插入**: O(log n + k)，k 为被驱逐的重叠段数量
//! - **驱逐**: O(log n)
//! - **前驱/后继**: O(1)，通过线索

mod config;
mod range_cache;
mod verify;

pub use config::{CacheConfig, CacheStats, CheckFlags};
pub use range_cache::{Floor, RangeCache};
