// 全局配置结构，放在 models 以便在库和二进制之间共享
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认 referrer，用于标识数据库创建请求的来源
pub const DEFAULT_REFERRER: &str = "instagres-cli";

/// 默认保存认领链接的环境变量名
pub const DEFAULT_CLAIM_URL_VAR: &str = "INSTAGRES_CLAIM_URL";

pub const DEFAULT_API_BASE_URL: &str = "https://instagres.com/api/v1";

pub const DEFAULT_CLAIM_BASE_URL: &str = "https://instagres.com/claim";

/// Instagres 全局配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstagresConfig {
    /// 创建数据库时携带的 referrer
    #[serde(default = "default_referrer")]
    pub referrer: String,
    /// 创建数据库后是否自动写入默认连接（等同于 `--set-default`）
    #[serde(default)]
    pub auto_configure: bool,
    /// 保存认领链接的环境变量名
    #[serde(default = "default_claim_url_var")]
    pub claim_url_var: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_claim_base_url")]
    pub claim_base_url: String,
    /// 要编辑的 env 文件，未设置时使用当前目录下的 `.env`
    #[serde(default)]
    pub env_file: Option<PathBuf>,
    /// HTTP 请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_referrer() -> String {
    DEFAULT_REFERRER.to_string()
}

fn default_claim_url_var() -> String {
    DEFAULT_CLAIM_URL_VAR.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_claim_base_url() -> String {
    DEFAULT_CLAIM_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for InstagresConfig {
    fn default() -> Self {
        Self {
            referrer: default_referrer(),
            auto_configure: false,
            claim_url_var: default_claim_url_var(),
            api_base_url: default_api_base_url(),
            claim_base_url: default_claim_base_url(),
            env_file: None,
            timeout_secs: default_timeout_secs(),
            log: LogConfig::default(),
        }
    }
}

impl InstagresConfig {
    /// 实际使用的 env 文件路径
    pub fn env_path(&self) -> PathBuf {
        self.env_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::data::managers::env::ENV_FILE_NAME))
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("无效的日志级别: {s}")),
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// 输出到 stderr，避免与命令输出混在一起
    #[default]
    Console,
    File,
    Both,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub output: LogOutput,
    /// 日志目录（文件输出时使用），默认 `~/.instagres/logs`
    #[serde(default)]
    pub file_path: Option<String>,
}
