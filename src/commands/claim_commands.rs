// 认领链接相关命令
//
// 从 env 文件中读取一个或全部认领链接

use super::output::{bullet, table};
use ::instagres::data::{EnvManager, FileSystem};
use ::instagres::models::InstagresConfig;
use ::instagres::services::env_sync::format_connection_label;
use ::instagres::services::{claim_url_key, find_claim_urls};
use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::process::ExitCode;

#[derive(Args, Debug, Default, Clone)]
pub struct ClaimUrlArgs {
    /// 只显示指定连接的认领链接，例如 "staging" 对应 STAGING_CLAIM_URL，"default" 对应默认连接
    #[arg(long)]
    pub name: Option<String>,
}

/// `instagres claim-url`
pub fn show_claim_urls<F: FileSystem>(
    args: &ClaimUrlArgs,
    config: &InstagresConfig,
    editor: &EnvManager<F>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    match args.name.as_deref() {
        Some(name) => show_specific_claim_url(name, config, editor, out),
        None => show_all_claim_urls(config, editor, out),
    }
}

fn show_specific_claim_url<F: FileSystem>(
    name: &str,
    config: &InstagresConfig,
    editor: &EnvManager<F>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let key = claim_url_key(name, &config.claim_url_var);
    let claim_url = editor.get(&key)?.filter(|url| !url.is_empty());

    let Some(claim_url) = claim_url else {
        writeln!(out, "✘ 在 {} 中未找到 {key}", editor.path().display())?;
        writeln!(out)?;
        if name.eq_ignore_ascii_case("default") {
            writeln!(out, "请先创建默认连接：")?;
            writeln!(out, "  instagres create --set-default")?;
        } else {
            writeln!(out, "请先创建命名连接：")?;
            writeln!(out, "  instagres create --save-as={name}")?;
        }
        writeln!(out)?;
        writeln!(out, "或查看全部认领链接：")?;
        writeln!(out, "  instagres claim-url")?;
        return Ok(ExitCode::FAILURE);
    };

    let label = format_connection_label(&key, &config.claim_url_var);
    writeln!(out, "{label} 的认领链接")?;
    writeln!(out, "{claim_url}")?;
    display_claim_instructions(out)?;
    Ok(ExitCode::SUCCESS)
}

fn show_all_claim_urls<F: FileSystem>(
    config: &InstagresConfig,
    editor: &EnvManager<F>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let entries = find_claim_urls(editor, &config.claim_url_var)?;

    if entries.is_empty() {
        writeln!(out, "✘ 在 {} 中未找到任何认领链接", editor.path().display())?;
        writeln!(out)?;
        writeln!(out, "请先创建数据库：")?;
        writeln!(out, "  instagres create --set-default")?;
        writeln!(out, "  instagres create --save-as=staging")?;
        return Ok(ExitCode::FAILURE);
    }

    writeln!(out, "Instagres 认领链接")?;
    writeln!(out)?;
    let rows: Vec<(String, String)> = entries.into_iter().map(|e| (e.label, e.url)).collect();
    table(out, ["Connection", "Claim URL"], &rows)?;

    display_claim_instructions(out)?;
    Ok(ExitCode::SUCCESS)
}

fn display_claim_instructions(out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    bullet(out, "访问认领链接认领数据库")?;
    bullet(out, "登录 Neon 账号（或注册新账号）")?;
    bullet(out, "认领后数据库将永久保留")?;
    writeln!(out)?;
    writeln!(out, "⏱️  未认领的数据库将在 72 小时后过期")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(name: Option<&str>, content: Option<&str>) -> (ExitCode, String) {
        let temp_dir = TempDir::new().unwrap();
        let editor = EnvManager::in_dir(temp_dir.path());
        if let Some(content) = content {
            fs::write(editor.path(), content).unwrap();
        }

        let args = ClaimUrlArgs {
            name: name.map(str::to_string),
        };
        let mut out = Vec::new();
        let code = show_claim_urls(&args, &InstagresConfig::default(), &editor, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    const ENV: &str = "INSTAGRES_CLAIM_URL=https://c/default\nSTAGING_CLAIM_URL=https://c/staging\n";

    #[test]
    fn test_show_specific_default() {
        let (code, output) = run(Some("default"), Some(ENV));

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(output.starts_with("Default 的认领链接\nhttps://c/default\n"));
    }

    #[test]
    fn test_show_specific_named() {
        let (code, output) = run(Some("staging"), Some(ENV));

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(output.contains("Staging 的认领链接\nhttps://c/staging\n"));
    }

    #[test]
    fn test_show_specific_missing() {
        let (code, output) = run(Some("prod"), Some(ENV));

        assert_eq!(code, ExitCode::FAILURE);
        assert!(output.contains("未找到 PROD_CLAIM_URL"));
        assert!(output.contains("instagres create --save-as=prod"));
    }

    #[test]
    fn test_show_all() {
        let (code, output) = run(None, Some(ENV));

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(output.contains("| Default    | https://c/default |"));
        assert!(output.contains("| Staging    | https://c/staging |"));
    }

    #[test]
    fn test_show_all_without_env_file() {
        let (code, output) = run(None, None);

        assert_eq!(code, ExitCode::FAILURE);
        assert!(output.contains("未找到任何认领链接"));
    }
}
