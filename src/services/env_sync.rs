//! 数据库信息与 env 文件之间的同步
//!
//! 决定写入哪些变量，以及从 env 文件中找回认领链接。

use crate::core::error::AppResult;
use crate::data::{EnvManager, FileSystem};
use crate::models::{ClaimUrlEntry, DatabaseInfo};
use crate::services::connection::parse_connection_string;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

/// 认领链接变量名的后缀
pub const CLAIM_URL_SUFFIX: &str = "_CLAIM_URL";

static CLAIM_URL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9_]+_CLAIM_URL$").expect("valid claim url regex"));

/// 作为默认连接写入时使用的变量风格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultStyle {
    /// 只写 `DATABASE_URL`
    Url,
    /// 拆分为 `DB_*` 字段
    Fields,
}

/// 写入选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    pub set_default: Option<DefaultStyle>,
    /// 命名连接的前缀，如 `staging` → `STAGING_CONNECTION_STRING`
    pub save_as: Option<String>,
    pub claim_url_var: String,
}

/// 把任意名称规范化为环境变量前缀：大写，非字母数字替换为 `_`
pub fn normalize_prefix(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// 根据选项生成要写入的变量（保持写入顺序）
pub fn database_variables(
    info: &DatabaseInfo,
    options: &SaveOptions,
) -> AppResult<Vec<(String, String)>> {
    let mut variables = Vec::new();

    match options.set_default {
        Some(DefaultStyle::Url) => {
            variables.push(("DATABASE_URL".to_string(), info.connection_string.clone()));
        }
        Some(DefaultStyle::Fields) => {
            let parsed = parse_connection_string(&info.connection_string)?;
            variables.extend([
                ("DB_CONNECTION".to_string(), "pgsql".to_string()),
                ("DB_HOST".to_string(), parsed.host),
                ("DB_PORT".to_string(), parsed.port),
                ("DB_DATABASE".to_string(), parsed.database),
                ("DB_USERNAME".to_string(), parsed.user),
                ("DB_PASSWORD".to_string(), parsed.password),
            ]);
        }
        None => {}
    }

    if let Some(name) = options.save_as.as_deref() {
        let prefix = normalize_prefix(name);
        variables.push((
            format!("{prefix}_CONNECTION_STRING"),
            info.connection_string.clone(),
        ));
        let claim_key = format!("{prefix}{CLAIM_URL_SUFFIX}");
        if claim_key != options.claim_url_var {
            variables.push((claim_key, info.claim_url.clone()));
        }
    }

    variables.push((options.claim_url_var.clone(), info.claim_url.clone()));
    Ok(variables)
}

/// 一次写入的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDatabase {
    /// 按写入顺序排列的变量
    pub variables: Vec<(String, String)>,
    /// 实际写出的备份文件；文件原本不存在或备份失败时为 `None`
    pub backup: Option<PathBuf>,
}

/// 写入数据库变量，整个批次只备份一次
///
/// 备份失败只记录警告，仍然写入。
pub fn save_database<F: FileSystem>(
    editor: &EnvManager<F>,
    info: &DatabaseInfo,
    options: &SaveOptions,
) -> AppResult<SavedDatabase> {
    let variables = database_variables(info, options)?;

    let backup = if editor.exists() {
        match editor.backup() {
            Ok(()) => Some(editor.backup_path()),
            Err(e) => {
                tracing::warn!(path = ?editor.path(), error = %e, "备份 env 文件失败，继续写入");
                None
            }
        }
    } else {
        None
    };

    editor.set_multiple(variables.iter().map(|(k, v)| (k, v)), false)?;

    tracing::info!(path = ?editor.path(), count = variables.len(), "数据库变量已写入 env 文件");
    Ok(SavedDatabase { variables, backup })
}

/// 按名称查找认领链接对应的变量名
///
/// `default`（不区分大小写）对应配置的默认变量，其余为 `{NAME}_CLAIM_URL`。
pub fn claim_url_key(name: &str, claim_url_var: &str) -> String {
    if name.trim().eq_ignore_ascii_case("default") {
        claim_url_var.to_string()
    } else {
        format!("{}{CLAIM_URL_SUFFIX}", normalize_prefix(name))
    }
}

/// 列出 env 文件中所有 `*_CLAIM_URL` 变量（文件顺序，重复键取第一个）
pub fn find_claim_urls<F: FileSystem>(
    editor: &EnvManager<F>,
    claim_url_var: &str,
) -> AppResult<Vec<ClaimUrlEntry>> {
    let mut found: Vec<ClaimUrlEntry> = Vec::new();

    for (key, url) in editor.entries()? {
        let is_claim_key = key == claim_url_var || CLAIM_URL_KEY.is_match(&key);
        if !is_claim_key || url.is_empty() || found.iter().any(|e| e.key == key) {
            continue;
        }
        found.push(ClaimUrlEntry {
            label: format_connection_label(&key, claim_url_var),
            key,
            url,
        });
    }

    Ok(found)
}

/// `INSTAGRES_CLAIM_URL` → `Default`，`STAGING_CLAIM_URL` → `Staging`，
/// `EU_WEST_CLAIM_URL` → `Eu West`
pub fn format_connection_label(key: &str, claim_url_var: &str) -> String {
    if key == claim_url_var {
        return "Default".to_string();
    }

    key.strip_suffix(CLAIM_URL_SUFFIX)
        .unwrap_or(key)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
