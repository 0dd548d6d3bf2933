//! 数据管理器实现
//!
//! - `env`: ENV 文件管理器（保留注释，原位更新）

pub mod env;

pub use env::{escape_value, unescape_value, EnvManager};
