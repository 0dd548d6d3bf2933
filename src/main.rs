use anyhow::Context;
use clap::{Parser, Subcommand};
use instagres::models::{InstagresConfig, LogLevel};
use instagres::utils::config::load_config;
use instagres::{init_logger, EnvManager, InstagresClient};
use std::path::PathBuf;
use std::process::ExitCode;

// 导入 commands 模块
mod commands;
use commands::*;

#[derive(Parser, Debug)]
#[command(name = "instagres")]
#[command(about = "创建可认领的 Neon Postgres 数据库，并写入 .env 文件")]
#[command(version)]
struct Cli {
    /// 要编辑的 env 文件（默认 ./.env）
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// 配置文件路径（默认 ~/.instagres/config.json）
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 输出调试日志（等同于 --log-level debug）
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 日志级别：error / warn / info / debug / trace，优先于 --verbose
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 创建新的可认领数据库
    Create(CreateArgs),
    /// 显示 env 文件中保存的认领链接
    ClaimUrl(ClaimUrlArgs),
    /// 直接读写 env 文件
    #[command(subcommand)]
    Env(EnvCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "命令执行失败");
            eprintln!("错误: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref()).context("加载配置失败")?;
    apply_cli_overrides(&cli, &mut config);

    if let Err(e) = init_logger(&config.log) {
        eprintln!("初始化日志系统失败: {e}");
    }

    let editor = EnvManager::new(config.env_path());
    let mut out = std::io::stdout();

    match &cli.command {
        Command::Create(args) => {
            let client = InstagresClient::new(&config).context("创建 HTTP 客户端失败")?;
            create_database(args, &config, &client, &editor, &mut out).await
        }
        Command::ClaimUrl(args) => show_claim_urls(args, &config, &editor, &mut out),
        Command::Env(command) => run_env_command(command, &editor, &mut out),
    }
}

/// 命令行参数覆盖配置文件与环境变量
fn apply_cli_overrides(cli: &Cli, config: &mut InstagresConfig) {
    if let Some(level) = cli.log_level {
        config.log.level = level;
    } else if cli.verbose {
        config.log.level = LogLevel::Debug;
    }
    if let Some(path) = &cli.env_file {
        config.env_file = Some(path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_flags() {
        let cli = Cli::parse_from([
            "instagres",
            "--env-file",
            "/tmp/app/.env",
            "create",
            "--set-default",
            "--url",
            "--save-as",
            "staging",
        ]);

        assert_eq!(cli.env_file, Some(PathBuf::from("/tmp/app/.env")));
        match cli.command {
            Command::Create(args) => {
                assert!(args.set_default);
                assert!(args.url);
                assert_eq!(args.save_as.as_deref(), Some("staging"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_env_set() {
        let cli = Cli::parse_from(["instagres", "env", "set", "A=1", "B=2", "--no-backup", "-v"]);

        assert!(cli.verbose);
        match cli.command {
            Command::Env(EnvCommand::Set {
                assignments,
                no_backup,
            }) => {
                assert_eq!(assignments, vec!["A=1", "B=2"]);
                assert!(no_backup);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_claim_url_name() {
        let cli = Cli::parse_from(["instagres", "claim-url", "--name", "staging"]);
        match cli.command {
            Command::ClaimUrl(args) => assert_eq!(args.name.as_deref(), Some("staging")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_level() {
        let cli = Cli::parse_from(["instagres", "env", "backup", "--log-level", "TRACE"]);
        assert_eq!(cli.log_level, Some(LogLevel::Trace));

        let cli = Cli::parse_from(["instagres", "claim-url"]);
        assert_eq!(cli.log_level, None);

        assert!(Cli::try_parse_from(["instagres", "--log-level", "loud", "claim-url"]).is_err());
    }

    #[test]
    fn test_log_level_flag_wins_over_verbose() {
        let mut config = InstagresConfig::default();
        let cli = Cli::parse_from(["instagres", "-v", "--log-level", "error", "claim-url"]);
        apply_cli_overrides(&cli, &mut config);
        assert_eq!(config.log.level, LogLevel::Error);

        let mut config = InstagresConfig::default();
        let cli = Cli::parse_from(["instagres", "-v", "--env-file", "/srv/.env", "claim-url"]);
        apply_cli_overrides(&cli, &mut config);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.env_path(), PathBuf::from("/srv/.env"));
    }
}
