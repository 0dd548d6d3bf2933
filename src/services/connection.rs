//! Postgres 连接字符串解析

use crate::core::error::{AppError, AppResult};
use crate::models::ParsedConnection;
use std::collections::BTreeMap;
use url::Url;

pub const DEFAULT_PORT: u16 = 5432;

/// 解析 `postgres://` / `postgresql://` 连接字符串
///
/// 用户名和密码会做百分号解码；端口缺省为 5432；查询参数进入 `options`。
pub fn parse_connection_string(connection_string: &str) -> AppResult<ParsedConnection> {
    let invalid = |reason: &str| AppError::InvalidConnectionString(reason.to_string());

    let url = Url::parse(connection_string.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(invalid(&format!("不支持的协议: {}", url.scheme())));
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("缺少主机名"))?
        .to_string();
    let port = url.port().unwrap_or(DEFAULT_PORT).to_string();
    let database = decode(url.path().trim_start_matches('/'))?;
    if database.is_empty() {
        return Err(invalid("缺少数据库名"));
    }
    let user = decode(url.username())?;
    let password = decode(url.password().unwrap_or_default())?;

    let options: BTreeMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut dsn = format!(
        "host={} port={} dbname={}",
        conninfo_value(&host),
        port,
        conninfo_value(&database)
    );
    for (key, value) in &options {
        dsn.push_str(&format!(" {key}={}", conninfo_value(value)));
    }

    Ok(ParsedConnection {
        host,
        port,
        database,
        user,
        password,
        dsn,
        options,
    })
}

fn decode(raw: &str) -> AppResult<String> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| AppError::InvalidConnectionString(format!("百分号编码无效: {e}")))
}

/// libpq 关键字值：含空白、引号或反斜杠时用单引号包裹并转义
fn conninfo_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
