//! 数据管理模块
//!
//! 提供 `.env` 文件的安全读写。
//!
//! # 模块组织
//!
//! - `error`: 统一错误类型定义
//! - `fs`: 文件系统抽象（便于测试时注入故障）
//! - `managers`: 各格式管理器（目前只有 ENV）
//!
//! # 使用示例
//!
//! ```rust
//! use instagres::data::EnvManager;
//!
//! let manager = EnvManager::new(".env");
//! manager.set_multiple([("DB_HOST", "localhost"), ("DB_PORT", "5432")], true)?;
//! ```

pub mod error;
pub mod fs;
pub mod managers;

pub use error::{DataError, Result};
pub use fs::{FileSystem, StdFileSystem};
pub use managers::EnvManager;
