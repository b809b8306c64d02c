use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

mod task;

/// 日志子系统配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 文件日志过滤等级 (EnvFilter 语法, 如 "info" 或 "yun_codec=debug")
    pub level: String,
    /// 日志目录
    pub directory: String,
    /// 日志文件名前缀
    pub file_prefix: String,
    /// 历史日志保留天数
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// 是否将历史日志压缩为 .gz
    #[serde(default = "default_true")]
    pub compress_history: bool,
    /// 清理任务执行间隔 (秒)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> i64 {
    30
}

fn default_cleanup_interval() -> u64 {
    3600
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: "logs".to_string(),
            file_prefix: "yun".to_string(),
            retention_days: default_retention_days(),
            compress_history: default_true(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

impl LoggingConfig {
    /// 从 JSON 配置文件加载日志配置
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取日志配置失败, path={}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("解析日志配置失败, path={}", path.display()))?;
        Ok(config)
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// 以默认配置初始化日志系统
pub fn init() -> Result<()> {
    init_with_config(LoggingConfig::default())
}

/// 初始化日志系统: 控制台 + 按日翻滚的文件输出, 并启动后台维护任务.
///
/// 全局订阅器只能注册一次, 重复调用返回错误.
/// 需要在 tokio 运行时内调用, 否则维护任务无法启动.
pub fn init_with_config(config: LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory)?;

    let rotate_requested = Arc::new(AtomicBool::new(false));
    let file_writer = DailyFileWriter::new(
        Path::new(&config.directory),
        &config.file_prefix,
        Arc::clone(&rotate_requested),
    )?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_writer);
    LOG_GUARD.set(guard).ok();

    // 控制台跟随 RUST_LOG, 文件等级由配置决定
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_filter = EnvFilter::new(&config.level);

    let console_layer = fmt::Layer::default()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(AnsiConsoleFormat)
        .with_filter(console_filter);

    let file_layer = fmt::Layer::default()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(PlainFileFormat)
        .with_filter(file_filter);

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("注册全局日志订阅器失败")?;

    task::spawn_maintenance(config, rotate_requested);

    Ok(())
}

/// 始终追加到当日文件的写入端.
///
/// 跨过午夜后由维护任务置位 rotate_requested, 下一次写入前重新打开新日期的文件.
struct DailyFileWriter {
    directory: PathBuf,
    prefix: String,
    rotate_requested: Arc<AtomicBool>,
    file: File,
}

impl DailyFileWriter {
    fn new(directory: &Path, prefix: &str, rotate_requested: Arc<AtomicBool>) -> Result<Self> {
        let today = Local::now().date_naive();
        let file = open_append(&daily_log_path(directory, prefix, today))?;
        Ok(Self {
            directory: directory.to_path_buf(),
            prefix: prefix.to_string(),
            rotate_requested,
            file,
        })
    }

    fn reopen_today(&mut self) -> std::io::Result<()> {
        let today = Local::now().date_naive();
        let path = daily_log_path(&self.directory, &self.prefix, today);
        self.file = open_append(&path).map_err(std::io::Error::other)?;
        Ok(())
    }
}

impl Write for DailyFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.rotate_requested.swap(false, Ordering::AcqRel) {
            self.reopen_today()?;
        }
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("打开日志文件失败, path={}", path.display()))
}

pub(crate) fn daily_log_path(directory: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    directory.join(format!("{}.{}.log", prefix, date.format("%Y-%m-%d")))
}

struct AnsiConsoleFormat;

impl<S, N> FormatEvent<S, N> for AnsiConsoleFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let color = match *meta.level() {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            _ => "\x1b[34m",
        };
        write!(
            writer,
            "[{}] {}{:5}\x1b[0m {} > ",
            Local::now().format("%H:%M:%S%.3f"),
            color,
            meta.level().to_string(),
            meta.target()
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

struct PlainFileFormat;

impl<S, N> FormatEvent<S, N> for PlainFileFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "[{}] {:5} {} > ",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            meta.level().to_string(),
            meta.target()
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
