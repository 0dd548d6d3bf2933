//! 服务层错误类型

use crate::data::DataError;
use thiserror::Error;

/// 服务层统一错误
#[derive(Error, Debug)]
pub enum AppError {
    /// 网络请求失败
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 服务端拒绝创建数据库
    #[error("创建数据库失败 ({status}): {body}")]
    Provision { status: u16, body: String },

    /// 服务端响应缺少必要字段
    #[error("无效的服务端响应: {0}")]
    InvalidResponse(String),

    #[error("无效的连接字符串: {0}")]
    InvalidConnectionString(String),

    #[error("配置错误: {0}")]
    Config(String),

    /// env 文件读写失败
    #[error(transparent)]
    Env(#[from] DataError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
