use super::{LoggingConfig, daily_log_path};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, TimeZone, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};
use tracing::error;

/// 启动日志维护任务: 定期清理历史、跨午夜时翻滚到新日期文件.
pub(super) fn spawn_maintenance(config: LoggingConfig, rotate_requested: Arc<AtomicBool>) {
    tokio::spawn(async move {
        let mut cleanup_tick =
            tokio::time::interval(Duration::from_secs(config.cleanup_interval_seconds));

        if let Err(err) = touch_today_log(&config) {
            error!("初始化当前日志文件失败: {}", err);
        }
        if let Err(err) = cleanup_history(&config) {
            error!("启动时清理日志失败: {}", err);
        }

        let mut rollover_at = match next_midnight(Local::now()) {
            Ok(at) => at,
            Err(err) => {
                error!("计算下一次翻滚时间失败: {}", err);
                tokio::time::Instant::now() + Duration::from_secs(1)
            }
        };

        loop {
            tokio::select! {
                _ = cleanup_tick.tick() => {
                    if let Err(err) = cleanup_history(&config) {
                        error!("清理日志失败: {}", err);
                    }
                }
                _ = tokio::time::sleep_until(rollover_at) => {
                    match touch_today_log(&config) {
                        Ok(()) => rotate_requested.store(true, Ordering::Release),
                        Err(err) => error!("日志翻滚失败: {}", err),
                    }

                    if let Err(err) = cleanup_history(&config) {
                        error!("翻滚后清理日志失败: {}", err);
                    }

                    rollover_at = match next_midnight(Local::now()) {
                        Ok(at) => at,
                        Err(err) => {
                            error!("重新计算下一次翻滚时间失败: {}", err);
                            tokio::time::Instant::now() + Duration::from_secs(1)
                        }
                    };
                }
            }
        }
    });
}

/// 确保当日日志文件存在, 不存在则创建空文件
fn touch_today_log(config: &LoggingConfig) -> Result<()> {
    let directory = Path::new(&config.directory);
    fs::create_dir_all(directory)?;
    let today = Local::now().date_naive();
    let path = daily_log_path(directory, &config.file_prefix, today);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("创建当前日志文件失败, path={}", path.display()))?;
    Ok(())
}

/// 删除超过保留天数的历史日志, 并按配置把历史日志压缩为 .gz
fn cleanup_history(config: &LoggingConfig) -> Result<()> {
    let directory = Path::new(&config.directory);
    if !directory.exists() {
        return Ok(());
    }

    let today = Local::now().date_naive();
    let cutoff = today - ChronoDuration::days(config.retention_days);

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let Some((date, compressed)) = parse_history_name(&name, &config.file_prefix) else {
            continue;
        };

        if date < cutoff {
            let _ = fs::remove_file(entry.path());
        } else if config.compress_history && !compressed && date < today {
            let _ = gzip_replace(&entry.path());
        }
    }

    Ok(())
}

/// 将日志压缩为同名 .gz 并删除原文件
fn gzip_replace(path: &Path) -> Result<()> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    if gz_path.exists() {
        return Ok(());
    }

    let mut input =
        File::open(path).with_context(|| format!("打开待压缩日志失败, path={}", path.display()))?;
    let output = File::create(&gz_path)
        .with_context(|| format!("创建压缩日志失败, path={}", gz_path.display()))?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    std::io::copy(&mut input, &mut encoder)
        .with_context(|| format!("压缩日志失败, path={}", path.display()))?;
    encoder.finish()?;

    fs::remove_file(path)
        .with_context(|| format!("删除已压缩日志失败, path={}", path.display()))?;
    Ok(())
}

/// 解析 "prefix.YYYY-MM-DD.log[.gz]" 形式的文件名, 返回日期与是否已压缩
fn parse_history_name(file_name: &str, prefix: &str) -> Option<(NaiveDate, bool)> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('.')?;

    if let Some(date_part) = rest.strip_suffix(".log") {
        return Some((parse_date(date_part)?, false));
    }
    if let Some(date_part) = rest.strip_suffix(".log.gz") {
        return Some((parse_date(date_part)?, true));
    }

    None
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// 计算下一个本地午夜对应的 tokio Instant
fn next_midnight(now: DateTime<Local>) -> Result<tokio::time::Instant> {
    let midnight = (now.date_naive() + ChronoDuration::days(1))
        .and_hms_opt(0, 0, 0)
        .context("计算下一次日志翻滚时间失败")?;
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .context("转换本地时间失败")?;
    let until = SystemTime::from(local.with_timezone(&Utc))
        .duration_since(SystemTime::now())
        .unwrap_or(Duration::ZERO);
    Ok(tokio::time::Instant::now() + until)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_history_name() {
        let prefix = "yun";

        let parsed = parse_history_name("yun.2026-08-25.log", prefix);
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2026, 8, 25).map(|d| (d, false))
        );

        let parsed = parse_history_name("yun.2026-08-25.log.gz", prefix);
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2026, 8, 25).map(|d| (d, true))
        );

        assert!(parse_history_name("yun.log", prefix).is_none());
        assert!(parse_history_name("other.2026-08-25.log", prefix).is_none());
    }

    #[test]
    fn test_touch_today_log_creates_empty_file() {
        let temp_dir = TempDir::new().expect("创建临时目录失败");
        let config = LoggingConfig {
            directory: temp_dir.path().to_string_lossy().to_string(),
            file_prefix: "yun".to_string(),
            ..LoggingConfig::default()
        };

        touch_today_log(&config).expect("创建当前日志文件失败");

        let today = Local::now().date_naive();
        let path = daily_log_path(temp_dir.path(), "yun", today);
        assert!(path.exists(), "当前日志文件不存在");
        let metadata = path.metadata().expect("读取当前日志元数据失败");
        assert_eq!(metadata.len(), 0);
    }

    #[test]
    fn test_cleanup_history_删除过期并压缩历史() {
        let temp_dir = TempDir::new().expect("创建临时目录失败");
        let config = LoggingConfig {
            directory: temp_dir.path().to_string_lossy().to_string(),
            file_prefix: "yun".to_string(),
            retention_days: 30,
            compress_history: true,
            ..LoggingConfig::default()
        };

        let today = Local::now().date_naive();
        let expired = today - ChronoDuration::days(40);
        let recent = today - ChronoDuration::days(1);

        let expired_path = daily_log_path(temp_dir.path(), "yun", expired);
        let recent_path = daily_log_path(temp_dir.path(), "yun", recent);
        let today_path = daily_log_path(temp_dir.path(), "yun", today);
        fs::write(&expired_path, b"expired").expect("写入过期日志失败");
        fs::write(&recent_path, b"recent").expect("写入历史日志失败");
        fs::write(&today_path, b"today").expect("写入当日日志失败");

        cleanup_history(&config).expect("清理日志失败");

        assert!(!expired_path.exists(), "过期日志应被删除");
        assert!(!recent_path.exists(), "历史日志压缩后原文件应被删除");
        let gz_path = PathBuf::from(format!("{}.gz", recent_path.display()));
        assert!(gz_path.exists(), "历史日志应被压缩为 .gz");
        assert!(today_path.exists(), "当日日志不应被处理");
    }
}
