//! ENV 文件管理器
//!
//! 对人工维护的 `.env` 文件做最小化修改，支持：
//! - 保留注释、空行以及无关变量（逐字节不变）
//! - 更新已有键、激活被注释的键、追加新键
//! - 修改前可选备份到 `<path>.backup`
//! - 含空白、`#`、`"` 的值自动加引号转义
//!
//! 每次操作都重新读取磁盘内容，不做缓存，也不加锁。
//!
//! # 使用示例
//!
//! ```rust
//! use instagres::data::managers::EnvManager;
//!
//! let manager = EnvManager::new(".env");
//!
//! // 设置值（保留注释，先备份）
//! manager.set("DB_HOST", "localhost", true)?;
//!
//! // 读取值
//! let host = manager.get("DB_HOST")?;
//! ```

use crate::data::fs::{FileSystem, StdFileSystem};
use crate::data::{DataError, Result};
use std::path::{Path, PathBuf};

/// 默认的 env 文件名
pub const ENV_FILE_NAME: &str = ".env";

/// 备份文件后缀
pub const BACKUP_SUFFIX: &str = ".backup";

/// ENV 文件管理器
///
/// 只持有文件路径和文件系统实现，由调用方显式构造。
#[derive(Debug, Clone)]
pub struct EnvManager<F = StdFileSystem> {
    path: PathBuf,
    fs: F,
}

impl EnvManager<StdFileSystem> {
    /// 管理指定路径的文件
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fs(path, StdFileSystem)
    }

    /// 管理 `dir/.env`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(ENV_FILE_NAME))
    }
}

impl<F: FileSystem> EnvManager<F> {
    /// 使用自定义文件系统实现
    pub fn with_fs(path: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 备份文件路径：`<path>.backup`
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// 文件当前是否存在（每次调用都重新检查）
    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// 获取指定键的值
    ///
    /// 只匹配未注释的赋值行；存在重复键时取文件中第一个。
    ///
    /// # 返回
    ///
    /// - `Ok(Some(value))`: 反转义后的值
    /// - `Ok(None)`: 文件或键不存在
    /// - `Err(DataError)`: 读取失败
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if !self.exists() {
            return Ok(None);
        }

        let content = self.read()?;
        Ok(content
            .split_inclusive('\n')
            .find_map(|line| active_value(line, key))
            .map(unescape_value))
    }

    /// 按文件顺序列出所有未注释的赋值（值已反转义）
    ///
    /// 文件不存在时返回空列表。
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let content = self.read()?;
        Ok(content
            .split_inclusive('\n')
            .filter_map(parse_assignment)
            .map(|(key, value)| (key.to_string(), unescape_value(value)))
            .collect())
    }

    /// 设置指定键的值（保留其他行）
    ///
    /// - 文件不存在：新建，仅包含 `KEY=value`，不备份
    /// - 已有同名赋值：原位替换第一处
    /// - 仅有被注释的同名赋值：整行替换为激活的赋值
    /// - 否则追加到文件末尾
    ///
    /// 备份失败只记录警告，不影响写入。
    pub fn set(&self, key: &str, value: &str, create_backup: bool) -> Result<()> {
        let escaped = escape_value(value);

        if !self.exists() {
            self.write(&format!("{key}={escaped}\n"))?;
            tracing::info!(path = ?self.path, key, "已创建 env 文件");
            return Ok(());
        }

        if create_backup {
            if let Err(e) = self.backup() {
                tracing::warn!(path = ?self.path, error = %e, "备份 env 文件失败，继续写入");
            }
        }

        let content = self.read()?;
        let (updated, action) = upsert(&content, key, &escaped);
        self.write(&updated)?;

        tracing::debug!(path = ?self.path, key, ?action, "已写入 env 变量");
        Ok(())
    }

    /// 批量设置
    ///
    /// 只在开始前备份一次。按调用方给出的顺序逐个写入，遇到第一个失败即停止，
    /// 已写入的键不回滚，错误中列出已写入的键。
    pub fn set_multiple<I, K, V>(&self, entries: I, create_backup: bool) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        if entries.is_empty() {
            return Ok(());
        }

        if create_backup && self.exists() {
            if let Err(e) = self.backup() {
                tracing::warn!(path = ?self.path, error = %e, "备份 env 文件失败，继续写入");
            }
        }

        let mut applied = Vec::with_capacity(entries.len());
        for (key, value) in &entries {
            let key = key.as_ref();
            if let Err(source) = self.set(key, value.as_ref(), false) {
                tracing::error!(
                    path = ?self.path,
                    key,
                    applied = applied.len(),
                    error = %source,
                    "批量写入 env 变量中止"
                );
                return Err(DataError::BatchAborted {
                    key: key.to_string(),
                    applied,
                    source: Box::new(source),
                });
            }
            applied.push(key.to_string());
        }

        tracing::info!(path = ?self.path, count = applied.len(), "已批量写入 env 变量");
        Ok(())
    }

    /// 备份到 `<path>.backup`，覆盖已有备份
    pub fn backup(&self) -> Result<()> {
        if !self.exists() {
            return Err(DataError::NotFound(self.path.display().to_string()));
        }

        let backup_path = self.backup_path();
        self.fs
            .copy(&self.path, &backup_path)
            .map_err(|e| DataError::io(&backup_path, e))?;

        tracing::debug!(backup = ?backup_path, "已备份 env 文件");
        Ok(())
    }

    fn read(&self) -> Result<String> {
        self.fs
            .read_to_string(&self.path)
            .map_err(|e| DataError::io(&self.path, e))
    }

    fn write(&self, content: &str) -> Result<()> {
        self.fs
            .write(&self.path, content)
            .map_err(|e| DataError::io(&self.path, e))
    }
}

/// `set` 对文件内容做的修改类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Upsert {
    Updated,
    Uncommented,
    Appended,
}

/// 在文本中更新或插入 `key=escaped`
fn upsert(content: &str, key: &str, escaped: &str) -> (String, Upsert) {
    let assignment = format!("{key}={escaped}");
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let target = match lines.iter().position(|l| active_value(l, key).is_some()) {
        Some(index) => Some((index, Upsert::Updated)),
        None => lines
            .iter()
            .position(|l| is_commented_assignment(l, key))
            .map(|index| (index, Upsert::Uncommented)),
    };

    let Some((index, action)) = target else {
        let trimmed = content.trim_end();
        let updated = if trimmed.is_empty() {
            format!("{assignment}\n")
        } else {
            format!("{trimmed}\n{assignment}\n")
        };
        return (updated, Upsert::Appended);
    };

    let mut updated = String::with_capacity(content.len() + assignment.len());
    for (i, line) in lines.iter().enumerate() {
        if i == index {
            updated.push_str(&assignment);
            if line.ends_with('\n') {
                updated.push('\n');
            }
        } else {
            updated.push_str(line);
        }
    }
    (updated, action)
}

/// 去掉行尾换行符
fn line_body(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

/// 若该行是 `key` 的激活赋值，返回 `=` 之后的原始值
fn active_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line_body(line).strip_prefix(key)?.strip_prefix('=')
}

/// 该行是否为 `#KEY=` / `#   KEY=` 形式的注释赋值
fn is_commented_assignment(line: &str, key: &str) -> bool {
    line_body(line)
        .strip_prefix('#')
        .map(|rest| rest.trim_start())
        .and_then(|rest| rest.strip_prefix(key))
        .is_some_and(|rest| rest.starts_with('='))
}

/// 解析激活的赋值行，键只允许字母、数字和下划线
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line_body(line).split_once('=')?;
    let valid_key =
        !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid_key.then_some((key, value))
}

/// 转义值
///
/// 含空白、`#` 或 `"` 时：先把 `"` 替换为 `\"`，再整体加双引号；否则原样返回。
pub fn escape_value(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || c == '#' || c == '"');
    if !needs_quotes {
        return value.to_string();
    }

    format!("\"{}\"", value.replace('"', "\\\""))
}

/// 反转义值
///
/// 去掉首尾空白；若被一对双引号包裹，去掉引号并把 `\"` 还原为 `"`。
pub fn unescape_value(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\""),
        None => trimmed.to_string(),
    }
}
