// env 文件直接操作命令：get / set / backup

use ::instagres::data::{DataError, EnvManager, FileSystem};
use anyhow::{bail, Result};
use clap::Subcommand;
use std::io::Write;
use std::process::ExitCode;

#[derive(Subcommand, Debug, Clone)]
pub enum EnvCommand {
    /// 读取变量值（只匹配未注释的赋值）
    Get {
        key: String,
    },
    /// 设置一个或多个变量，格式 KEY=VALUE
    Set {
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// 修改前不备份
        #[arg(long)]
        no_backup: bool,
    },
    /// 备份 env 文件到 <path>.backup
    Backup,
}

/// `instagres env ...`
pub fn run_env_command<F: FileSystem>(
    command: &EnvCommand,
    editor: &EnvManager<F>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    match command {
        EnvCommand::Get { key } => match editor.get(key)? {
            Some(value) => {
                writeln!(out, "{value}")?;
                Ok(ExitCode::SUCCESS)
            }
            None => {
                writeln!(out, "✘ 在 {} 中未找到 {key}", editor.path().display())?;
                Ok(ExitCode::FAILURE)
            }
        },
        EnvCommand::Set {
            assignments,
            no_backup,
        } => {
            let pairs = parse_assignments(assignments)?;
            editor.set_multiple(pairs.iter().copied(), !no_backup)?;
            writeln!(
                out,
                "✔ 已更新 {} 个变量到 {}",
                pairs.len(),
                editor.path().display()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        EnvCommand::Backup => match editor.backup() {
            Ok(()) => {
                writeln!(out, "✔ 已备份到 {}", editor.backup_path().display())?;
                Ok(ExitCode::SUCCESS)
            }
            Err(DataError::NotFound(path)) => {
                writeln!(out, "✘ 文件不存在，无需备份: {path}")?;
                Ok(ExitCode::FAILURE)
            }
            Err(e) => Err(e.into()),
        },
    }
}

/// 解析 `KEY=VALUE` 参数；同一个键出现多次时以最后一次为准
fn parse_assignments(raw: &[String]) -> Result<Vec<(&str, &str)>> {
    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(raw.len());
    for item in raw {
        let Some((key, value)) = item.split_once('=') else {
            bail!("参数格式应为 KEY=VALUE: {item}");
        };
        if key.is_empty() || value.contains('\n') {
            bail!("无效的赋值: {item}");
        }
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => pairs.push((key, value)),
        }
    }
    Ok(pairs)
}
