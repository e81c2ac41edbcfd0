use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::Context;
use tokio::task;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

const LOG_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 3);
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// Resolve a configured level name; unknown names fall back to `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Daily-rotated file log plus a console layer on stderr.
///
/// stdout is left to the report. Must be called inside a tokio runtime
/// (old logs are swept by a background task).
pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let default_level = level_filter(level);

    let builder = EnvFilter::builder().with_default_directive(default_level.into());
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log appender in {}", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if default_level == LevelFilter::INFO && !level.trim().eq_ignore_ascii_case("info") {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    start_log_cleanup_task(log_dir, prefix.to_string());

    Ok(LoggerGuard(guard))
}

fn start_log_cleanup_task(log_dir: PathBuf, prefix: String) {
    task::spawn(async move {
        loop {
            if let Err(e) = cleanup_old_logs(&log_dir, &prefix, LOG_MAX_AGE) {
                tracing::warn!("Failed to delete old log file: {}", e);
            }
            tokio::time::sleep(CLEANUP_INTERVAL).await;
        }
    });
}

/// Delete `<prefix>*.log` files in `log_dir` last modified before `max_age`.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(file_name.starts_with(prefix) && file_name.ends_with(".log")) {
            continue;
        }

        let modified = fs::metadata(&path)?.modified();
        if let Ok(modified) = modified {
            if now.duration_since(modified).unwrap_or_default() > max_age {
                fs::remove_file(&path)?;
                tracing::info!("Old log file deleted: {}", file_name);
                removed += 1;
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("debug"), LevelFilter::DEBUG);
        assert_eq!(level_filter(" WARN "), LevelFilter::WARN);
        assert_eq!(level_filter("verbose"), LevelFilter::INFO);
    }

    #[test]
    fn test_cleanup_only_touches_matching_files() {
        let dir = TempDir::new().unwrap();
        let ten_days_ago = SystemTime::now() - Duration::from_secs(60 * 60 * 24 * 10);
        for name in ["fnstatus.2024-01-01.log", "other.2024-01-01.log", "fnstatus.txt"] {
            let path = dir.path().join(name);
            fs::write(&path, "old").unwrap();
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(ten_days_ago)
                .unwrap();
        }
        fs::write(dir.path().join("fnstatus.2024-01-09.log"), "fresh").unwrap();

        let removed = cleanup_old_logs(dir.path(), "fnstatus", LOG_MAX_AGE).unwrap();
        assert_eq!(removed, 1);
        assert!(!dir.path().join("fnstatus.2024-01-01.log").exists());
        assert!(dir.path().join("fnstatus.2024-01-09.log").exists());
        assert!(dir.path().join("other.2024-01-01.log").exists());
        assert!(dir.path().join("fnstatus.txt").exists());
    }
}
