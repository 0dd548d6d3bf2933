use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 新创建的可认领数据库
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub connection_string: String,
    pub claim_url: String,
    /// RFC 3339 时间戳，未认领的数据库在此之后被回收
    pub expires_at: String,
}

/// 解析后的 Postgres 连接信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedConnection {
    pub host: String,
    pub port: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// libpq 关键字格式：`host=... port=... dbname=... sslmode=require`
    pub dsn: String,
    /// 查询参数（如 `sslmode`）
    pub options: BTreeMap<String, String>,
}

/// env 文件中找到的一条认领链接
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClaimUrlEntry {
    pub key: String,
    /// 展示名，如 `Default`、`Staging`
    pub label: String,
    pub url: String,
}
