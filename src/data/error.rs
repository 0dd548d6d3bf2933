//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义 `.env` 编辑器的错误类型，调用方可以区分
//! "无事可做"（`NotFound`）与"出错了"（`Io` / `Permission` / `BatchAborted`）。

use std::path::PathBuf;
use thiserror::Error;

/// 数据管理模块的统一错误类型
#[derive(Error, Debug)]
pub enum DataError {
    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 资源未找到
    #[error("未找到资源: {0}")]
    NotFound(String),

    /// 权限错误
    #[error("权限错误: {0}")]
    Permission(String),

    /// 批量写入中途失败，之前已写入的键不会回滚
    #[error("批量写入在键 '{key}' 处中止（已写入: {applied:?}）: {source}")]
    BatchAborted {
        key: String,
        applied: Vec<String>,
        #[source]
        source: Box<DataError>,
    },
}

/// 便于与现有代码集成的类型别名
pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    /// 从 `std::io::Error` 和路径创建错误
    ///
    /// `PermissionDenied` 单独归类为 [`DataError::Permission`]。
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            return Self::Permission(format!("{}: {}", path.display(), source));
        }
        Self::Io { path, source }
    }

    /// 是否为"资源不存在"类错误
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
