//! File logging for the interactive session and CLI runs.
//!
//! Each run writes `todo-app-<timestamp>.log` under the local data directory.
//! Only the newest [`MAX_LOG_FILES`] files are kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_LEVEL_ENV: &str = "TODO_APP_LOG_LEVEL";
const LOG_FILE_PREFIX: &str = "todo-app-";
const LOG_FILE_SUFFIX: &str = ".log";
const MAX_LOG_FILES: usize = 10;

/// Active file logger. Buffered lines are flushed when this is dropped, so it
/// must be dropped before `std::process::exit`.
pub struct LogSession {
    path: PathBuf,
    _guard: WorkerGuard,
}

impl LogSession {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn init_logging() -> Result<LogSession, Box<dyn std::error::Error>> {
    let log_dir = log_directory()?;
    fs::create_dir_all(&log_dir)?;

    let path = log_dir.join(log_file_name(&Local::now().format("%Y-%m-%d_%H-%M-%S%.3f")));
    let file = fs::File::create(&path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(log_filter())
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    match prune_old_logs(&log_dir, MAX_LOG_FILES) {
        Ok(0) => {}
        Ok(removed) => tracing::debug!(removed, "pruned old log files"),
        Err(err) => tracing::warn!(error = %err, "failed to prune old log files"),
    }
    tracing::info!(path = %path.display(), "logging initialized");

    Ok(LogSession {
        path,
        _guard: guard,
    })
}

pub fn print_log_location(log_path: &Path) {
    eprintln!("log file: {}", log_path.display());
}

fn log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let data_dir = dirs::data_local_dir().ok_or("failed to determine local data directory")?;
    Ok(data_dir.join("todo-app").join("logs"))
}

fn log_file_name(timestamp: impl std::fmt::Display) -> String {
    format!("{LOG_FILE_PREFIX}{timestamp}{LOG_FILE_SUFFIX}")
}

fn log_filter() -> EnvFilter {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|raw| normalize_log_level(&raw))
        .unwrap_or("warn");
    EnvFilter::new(format!("{level},todo_app={level}"))
}

fn normalize_log_level(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Deletes all but the `keep` newest run logs in `log_dir` and returns how
/// many were removed. Timestamped names sort chronologically. Files that do
/// not look like run logs are never touched.
fn prune_old_logs(log_dir: &Path, keep: usize) -> io::Result<usize> {
    let mut logs: Vec<PathBuf> = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        name.starts_with(LOG_FILE_PREFIX) && name.ends_with(LOG_FILE_SUFFIX)
                    })
        })
        .collect();

    if logs.len() <= keep {
        return Ok(0);
    }

    logs.sort();
    let excess = logs.len() - keep;
    for path in &logs[..excess] {
        fs::remove_file(path)?;
    }
    Ok(excess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").expect("write log file");
    }

    fn remaining(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn log_directory_is_app_scoped() {
        let path = log_directory().expect("data dir should resolve");
        assert!(path.ends_with(Path::new("todo-app").join("logs")));
    }

    #[test]
    fn log_file_names_sort_by_time() {
        let earlier = log_file_name("2025-01-02_09-59-59.999");
        let later = log_file_name("2025-01-02_10-00-00.000");

        assert_eq!(earlier, "todo-app-2025-01-02_09-59-59.999.log");
        assert!(earlier < later);
    }

    #[test]
    fn normalize_log_level_accepts_aliases() {
        assert_eq!(normalize_log_level(" Debug "), Some("debug"));
        assert_eq!(normalize_log_level("warning"), Some("warn"));
        assert_eq!(normalize_log_level("verbose"), None);
    }

    #[test]
    fn prune_keeps_only_newest_run_logs() {
        let dir = TempDir::new().expect("temp dir");
        for second in 0..5 {
            touch(dir.path(), &log_file_name(format!("2025-01-02_10-00-0{second}.000")));
        }

        let removed = prune_old_logs(dir.path(), 3).expect("prune");

        assert_eq!(removed, 2);
        assert_eq!(
            remaining(dir.path()),
            [
                "todo-app-2025-01-02_10-00-02.000.log",
                "todo-app-2025-01-02_10-00-03.000.log",
                "todo-app-2025-01-02_10-00-04.000.log",
            ]
        );
    }

    #[test]
    fn prune_ignores_unrelated_files_and_small_dirs() {
        let dir = TempDir::new().expect("temp dir");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "todo-app-old.txt");
        touch(dir.path(), &log_file_name("2025-01-02_10-00-00.000"));

        assert_eq!(prune_old_logs(dir.path(), 1).expect("prune"), 0);
        assert_eq!(remaining(dir.path()).len(), 3);
    }
}
