//! 错误类型定义
//!
//! 提供范围缓存操作的错误类型。
//!
//! 只有可恢复的错误（池耗尽、参数错误、句柄误用）通过 [`Result`] 返回；
//! 索引内部不变量被破坏属于致命错误，由校验入口直接 panic。

use core::fmt;

use crate::tavl::CheckError;

/// 范围缓存操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 无效参数（零长度范围、越界范围、非驻留段句柄）
    InvalidInput,
    /// 空闲池耗尽，调用者需要先驱逐
    NoSpace,
    /// 索引结构损坏
    Corrupted,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<CheckError> for Error {
    fn from(err: CheckError) -> Self {
        Error::new(ErrorKind::Corrupted, err.message())
    }
}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_accessors() {
        let err = Error::new(ErrorKind::NoSpace, "no free segment");
        assert_eq!(err.kind(), ErrorKind::NoSpace);
        assert_eq!(err.message(), "no free segment");
    }

    #[test]
    fn test_check_error_maps_to_corrupted() {
        let err: Error = CheckError::Unbalanced.into();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert_eq!(err.message(), CheckError::Unbalanced.message());
    }
}
