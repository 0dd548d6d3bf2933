//! 可认领数据库的创建客户端
//!
//! 调用 Instagres API 创建一个临时 Neon Postgres 数据库，72 小时内未认领会被回收。

use crate::core::error::{AppError, AppResult};
use crate::core::http::build_http_client;
use crate::models::{DatabaseInfo, InstagresConfig};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

/// 未认领数据库的存活时间
pub const UNCLAIMED_TTL_HOURS: i64 = 72;

/// 数据库创建接口，CLI 通过它与具体实现解耦
#[async_trait]
pub trait DatabaseProvisioner: Send + Sync {
    /// 创建数据库；`db_id` 为空时自动生成 UUID v4
    async fn create(&self, referrer: &str, db_id: Option<&str>) -> AppResult<DatabaseInfo>;

    /// 指定数据库的认领链接
    fn claim_url(&self, db_id: &str) -> String;
}

/// 创建接口的响应
#[derive(Debug, Deserialize)]
struct CreateDatabaseResponse {
    connection_string: Option<String>,
    expires_at: Option<String>,
}

/// Instagres HTTP 客户端
pub struct InstagresClient {
    client: Client,
    api_base_url: String,
    claim_base_url: String,
}

impl InstagresClient {
    pub fn new(config: &InstagresConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            claim_base_url: config.claim_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_url(&self, db_id: &str, referrer: &str) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}/database/{db_id}", self.api_base_url))
            .map_err(|e| AppError::Config(format!("无效的 API 地址 {}: {e}", self.api_base_url)))?;
        url.query_pairs_mut().append_pair("referrer", referrer);
        Ok(url)
    }
}

#[async_trait]
impl DatabaseProvisioner for InstagresClient {
    async fn create(&self, referrer: &str, db_id: Option<&str>) -> AppResult<DatabaseInfo> {
        let db_id = db_id.map(str::to_string).unwrap_or_else(generate_uuid);
        let url = self.create_url(&db_id, referrer)?;

        tracing::info!(db_id = %db_id, referrer, "正在创建数据库");

        let response = self.client.post(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(db_id = %db_id, status = status.as_u16(), "创建数据库失败");
            return Err(AppError::Provision {
                status: status.as_u16(),
                body,
            });
        }

        let info = decode_create_response(&body, self.claim_url(&db_id), Utc::now())?;
        tracing::info!(db_id = %db_id, expires_at = %info.expires_at, "数据库创建成功");
        Ok(info)
    }

    fn claim_url(&self, db_id: &str) -> String {
        format!("{}/{db_id}", self.claim_base_url)
    }
}

/// 解析创建接口的响应体
///
/// 响应缺少 `expires_at` 时按 `now` + 72 小时计算。
fn decode_create_response(
    body: &str,
    claim_url: String,
    now: DateTime<Utc>,
) -> AppResult<DatabaseInfo> {
    let response: CreateDatabaseResponse = serde_json::from_str(body)
        .map_err(|e| AppError::InvalidResponse(format!("解析响应 JSON 失败: {e}")))?;

    let connection_string = response
        .connection_string
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidResponse("响应缺少 connection_string".to_string()))?;

    let expires_at = response.expires_at.unwrap_or_else(|| {
        (now + Duration::hours(UNCLAIMED_TTL_HOURS)).to_rfc3339_opts(SecondsFormat::Secs, true)
    });

    Ok(DatabaseInfo {
        connection_string,
        claim_url,
        expires_at,
    })
}

/// 生成随机 UUID v4（小写、带连字符）
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}
