// 创建数据库命令
//
// 调用 Instagres 创建可认领的数据库，展示连接信息，并按需写入 env 文件

use super::output::{bullet, describe_variable, two_column};
use ::instagres::data::{EnvManager, FileSystem};
use ::instagres::models::{DatabaseInfo, InstagresConfig};
use ::instagres::services::{
    parse_connection_string, save_database, DatabaseProvisioner, DefaultStyle, SaveOptions,
};
use anyhow::Result;
use clap::Args;
use std::io::Write;
use std::process::ExitCode;

#[derive(Args, Debug, Default, Clone)]
pub struct CreateArgs {
    /// 写入为默认数据库连接（DB_* 变量）
    #[arg(long)]
    pub set_default: bool,

    /// 与 --set-default 一起使用：写入 DATABASE_URL 而不是 DB_* 变量
    #[arg(long)]
    pub url: bool,

    /// 以命名连接保存，例如 "staging" 会写入 STAGING_CONNECTION_STRING
    #[arg(long, value_name = "NAME")]
    pub save_as: Option<String>,

    /// 覆盖配置中的 referrer
    #[arg(long)]
    pub referrer: Option<String>,
}

impl CreateArgs {
    /// 结合配置决定写入选项；什么都不写时返回 None
    fn save_options(&self, config: &InstagresConfig) -> Option<SaveOptions> {
        let set_default = (self.set_default || config.auto_configure).then_some(if self.url {
            DefaultStyle::Url
        } else {
            DefaultStyle::Fields
        });

        if set_default.is_none() && self.save_as.is_none() {
            return None;
        }

        Some(SaveOptions {
            set_default,
            save_as: self.save_as.clone(),
            claim_url_var: config.claim_url_var.clone(),
        })
    }
}

/// `instagres create`
pub async fn create_database<F: FileSystem>(
    args: &CreateArgs,
    config: &InstagresConfig,
    provisioner: &dyn DatabaseProvisioner,
    editor: &EnvManager<F>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    writeln!(out, "正在创建 Instagres 数据库...")?;
    writeln!(out)?;

    let referrer = args.referrer.as_deref().unwrap_or(&config.referrer);
    let database = match provisioner.create(referrer, None).await {
        Ok(database) => database,
        Err(e) => {
            tracing::error!(error = %e, "创建数据库失败");
            writeln!(out, "✘ 创建数据库失败: {e}")?;
            return Ok(ExitCode::FAILURE);
        }
    };

    display_database_info(&database, out)?;

    let Some(options) = args.save_options(config) else {
        writeln!(out)?;
        writeln!(out, "💡 提示：使用 --set-default 自动配置为默认数据库")?;
        writeln!(out, "   或使用 --save-as=NAME 保存为命名连接")?;
        return Ok(ExitCode::SUCCESS);
    };

    save_database_to_env(&database, &options, editor, out)
}

fn display_database_info(database: &DatabaseInfo, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "✔ 数据库创建成功！")?;
    writeln!(out)?;

    match parse_connection_string(&database.connection_string) {
        Ok(parsed) => {
            two_column(out, "Host", &parsed.host)?;
            two_column(out, "Database", &parsed.database)?;
            two_column(out, "User", &parsed.user)?;
            two_column(out, "Port", &parsed.port)?;
            writeln!(out)?;
        }
        Err(e) => tracing::warn!(error = %e, "无法解析连接字符串，跳过详情展示"),
    }

    two_column(out, "Connection String", &database.connection_string)?;
    writeln!(out)?;
    two_column(out, "Claim URL", &database.claim_url)?;
    two_column(out, "Expires At", &database.expires_at)?;

    writeln!(out)?;
    writeln!(out, "⏱️  未认领的数据库将在 72 小时后过期！")?;
    writeln!(out, "   访问认领链接即可永久保留。")?;
    Ok(())
}

fn save_database_to_env<F: FileSystem>(
    database: &DatabaseInfo,
    options: &SaveOptions,
    editor: &EnvManager<F>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    writeln!(out)?;
    writeln!(out, "正在更新 {} ...", editor.path().display())?;

    let had_file = editor.exists();
    let saved = match save_database(editor, database, options) {
        Ok(saved) => saved,
        Err(e) => {
            tracing::error!(error = %e, path = ?editor.path(), "写入 env 文件失败");
            writeln!(out)?;
            writeln!(out, "✘ 更新 env 文件失败: {e}")?;
            return Ok(ExitCode::FAILURE);
        }
    };

    for (key, value) in &saved.variables {
        bullet(out, &describe_variable(key, value))?;
    }

    writeln!(out)?;
    writeln!(out, "✔ env 文件更新成功！")?;
    match &saved.backup {
        Some(backup) => writeln!(out, "  （原文件已备份到 {}）", backup.display())?,
        None if had_file => writeln!(out, "⚠ 原文件备份失败，已直接写入")?,
        None => {}
    }
    Ok(ExitCode::SUCCESS)
}
