use crate::core::error::AppResult;
use crate::models::InstagresConfig;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("instagres-cli/", env!("CARGO_PKG_VERSION"));

/// 构建 HTTP 客户端
///
/// reqwest 默认会读取 HTTP_PROXY/HTTPS_PROXY/ALL_PROXY 等环境变量。
pub fn build_http_client(config: &InstagresConfig) -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    Ok(client)
}
