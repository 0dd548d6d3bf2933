use crate::core::error::{AppError, AppResult};
use crate::models::InstagresConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件中各项的环境变量覆盖
pub const ENV_REFERRER: &str = "INSTAGRES_REFERRER";
pub const ENV_AUTO_CONFIGURE: &str = "INSTAGRES_AUTO_CONFIGURE";
pub const ENV_CLAIM_URL_VAR: &str = "INSTAGRES_CLAIM_URL_VAR";
pub const ENV_API_URL: &str = "INSTAGRES_API_URL";

/// Instagres 配置目录 (~/.instagres)
pub fn config_dir() -> AppResult<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| AppError::Config("无法获取用户主目录".to_string()))?;
    Ok(home_dir.join(".instagres"))
}

/// 全局配置文件路径
pub fn global_config_path() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// 读取配置：配置文件（可选）→ 环境变量覆盖
///
/// `path` 为 `None` 时使用 `~/.instagres/config.json`。
pub fn load_config(path: Option<&Path>) -> AppResult<InstagresConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => global_config_path()?,
    };

    let mut config = read_config_file(&path)?.unwrap_or_default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// 读取配置文件（若文件不存在返回 Ok(None)）
fn read_config_file(path: &Path) -> AppResult<Option<InstagresConfig>> {
    if !path.exists() {
        tracing::debug!(path = ?path, "配置文件不存在，使用默认配置");
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("读取配置文件失败 {}: {e}", path.display())))?;
    let config = serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("解析配置文件失败 {}: {e}", path.display())))?;

    tracing::debug!(path = ?path, "已加载配置文件");
    Ok(Some(config))
}

fn apply_env_overrides(config: &mut InstagresConfig) -> AppResult<()> {
    if let Some(referrer) = non_empty_var(ENV_REFERRER) {
        config.referrer = referrer;
    }
    if let Some(raw) = non_empty_var(ENV_AUTO_CONFIGURE) {
        config.auto_configure = parse_bool(&raw).ok_or_else(|| {
            AppError::Config(format!("{ENV_AUTO_CONFIGURE} 不是有效的布尔值: {raw}"))
        })?;
    }
    if let Some(var) = non_empty_var(ENV_CLAIM_URL_VAR) {
        config.claim_url_var = var;
    }
    if let Some(url) = non_empty_var(ENV_API_URL) {
        config.api_base_url = url;
    }
    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// 兼容 `true/false/1/0/yes/no/on/off`
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{DEFAULT_CLAIM_URL_VAR, DEFAULT_REFERRER};
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        for name in [ENV_REFERRER, ENV_AUTO_CONFIGURE, ENV_CLAIM_URL_VAR, ENV_API_URL] {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();

        let config = load_config(Some(temp_dir.path().join("config.json").as_path())).unwrap();

        assert_eq!(config, InstagresConfig::default());
        assert_eq!(config.referrer, DEFAULT_REFERRER);
    }

    #[test]
    #[serial]
    fn test_file_values_are_loaded() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"referrer": "from-file", "auto_configure": true, "env_file": "/srv/.env"}"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(config.referrer, "from-file");
        assert!(config.auto_configure);
        assert_eq!(config.env_path(), PathBuf::from("/srv/.env"));
        assert_eq!(config.claim_url_var, DEFAULT_CLAIM_URL_VAR);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"referrer": "from-file"}"#).unwrap();

        std::env::set_var(ENV_REFERRER, "from-env");
        std::env::set_var(ENV_AUTO_CONFIGURE, "yes");
        std::env::set_var(ENV_CLAIM_URL_VAR, "NEON_CLAIM_URL");
        let config = load_config(Some(path.as_path()));
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.referrer, "from-env");
        assert!(config.auto_configure);
        assert_eq!(config.claim_url_var, "NEON_CLAIM_URL");
    }

    #[test]
    #[serial]
    fn test_invalid_bool_is_rejected() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();

        std::env::set_var(ENV_AUTO_CONFIGURE, "maybe");
        let result = load_config(Some(temp_dir.path().join("config.json").as_path()));
        clear_env();

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_invalid_json_is_rejected() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_config(Some(path.as_path())), Err(AppError::Config(_))));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("2"), None);
    }
}
