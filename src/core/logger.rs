use crate::models::config::{LogConfig, LogFormat, LogLevel, LogOutput};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// 初始化日志系统
///
/// 支持基于配置的日志输出，包括：
/// - 日志级别（trace/debug/info/warn/error），`RUST_LOG` 优先
/// - 输出格式（JSON/纯文本）
/// - 输出目标（控制台/文件/both），控制台输出写到 stderr
///
/// 重复初始化返回错误。
pub fn init_logger(config: &LogConfig) -> anyhow::Result<()> {
    let console_enabled = matches!(config.output, LogOutput::Console | LogOutput::Both);
    let log_dir = match config.output {
        LogOutput::File | LogOutput::Both => Some(get_log_dir(config.file_path.as_deref())?),
        LogOutput::Console => None,
    };

    tracing_subscriber::registry()
        .with(create_env_filter(&config.level))
        .with(console_enabled.then(|| create_console_layer(config.format)))
        .with(log_dir.map(|dir| create_file_layer(config.format, dir)))
        .try_init()
        .map_err(|e| anyhow::anyhow!("日志系统已初始化，不能重复初始化: {e}"))?;

    tracing::debug!(
        level = config.level.as_str(),
        format = ?config.format,
        output = ?config.output,
        file_path = ?config.file_path,
        "日志系统初始化完成"
    );

    Ok(())
}

/// 创建环境过滤器
fn create_env_filter(level: &LogLevel) -> EnvFilter {
    // 优先从环境变量读取，例如 RUST_LOG=instagres=trace,reqwest=debug
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // 默认配置：应用代码使用指定级别，第三方库使用 WARN
        EnvFilter::new(format!(
            "instagres={},hyper=warn,reqwest=warn,h2=warn,tokio=warn",
            level.as_str()
        ))
    })
}

/// 创建控制台输出层
fn create_console_layer<S>(format: LogFormat) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(cfg!(debug_assertions))
        .with_thread_ids(false);

    match format {
        LogFormat::Text => layer.with_ansi(true).boxed(),
        LogFormat::Json => layer.json().with_ansi(false).boxed(),
    }
}

/// 创建文件输出层（按天滚动）
fn create_file_layer<S>(format: LogFormat, log_dir: std::path::PathBuf) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let file_appender = rolling::daily(log_dir, "instagres");
    let (non_blocking, guard) = non_blocking(file_appender);

    // 进程退出前保持 guard 存活，否则缓冲的日志会丢失
    Box::leak(Box::new(guard));

    let layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_ansi(false);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().with_thread_ids(true).boxed(),
    }
}

/// 获取日志目录
fn get_log_dir(file_path: Option<&str>) -> anyhow::Result<std::path::PathBuf> {
    let dir = match file_path {
        Some(path) => std::path::PathBuf::from(path),
        // 使用用户主目录下的 .instagres/logs
        None => dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("无法获取用户主目录"))?
            .join(".instagres")
            .join("logs"),
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
