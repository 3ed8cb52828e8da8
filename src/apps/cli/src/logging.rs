//! Logging Configuration
//!
//! The TUI owns the terminal, so interactive sessions log to a per-session
//! file; one-shot commands log to stderr.

use anyhow::{anyhow, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

const LOG_LEVEL_ENV: &str = "EMAIL_CLASSIFIER_LOG_LEVEL";
const LOG_FILE_TIMESTAMP: &str = "%Y%m%dT%H%M%S";
const MAX_LOG_FILES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    SessionFile,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub is_debug: bool,
    pub target: LogTarget,
}

impl LogConfig {
    pub fn new(is_debug: bool, target: LogTarget) -> Self {
        Self {
            level: resolve_default_level(is_debug),
            is_debug,
            target,
        }
    }
}

fn resolve_default_level(is_debug: bool) -> LevelFilter {
    let fallback = if is_debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    match std::env::var(LOG_LEVEL_ENV) {
        Ok(val) => parse_log_level(&val).unwrap_or_else(|| {
            eprintln!(
                "Warning: Invalid {} '{}', falling back to default",
                LOG_LEVEL_ENV, val
            );
            fallback
        }),
        Err(_) => fallback,
    }
}

pub fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

pub fn level_to_str(level: LevelFilter) -> &'static str {
    if level == LevelFilter::TRACE {
        "trace"
    } else if level == LevelFilter::DEBUG {
        "debug"
    } else if level == LevelFilter::INFO {
        "info"
    } else if level == LevelFilter::WARN {
        "warn"
    } else if level == LevelFilter::ERROR {
        "error"
    } else {
        "off"
    }
}

pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("email-classifier").join("logs"))
}

fn create_session_log_file(logs_root: &Path) -> Result<(PathBuf, std::fs::File)> {
    std::fs::create_dir_all(logs_root)?;
    let timestamp = Local::now().format(LOG_FILE_TIMESTAMP).to_string();
    let path = logs_root.join(format!("{}.log", timestamp));
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok((path, file))
}

fn build_filter(level: LevelFilter) -> EnvFilter {
    // HTTP internals stay quiet unless explicitly tracing
    EnvFilter::new(format!(
        "{},hyper_util=warn,rustls=warn",
        level_to_str(level)
    ))
}

/// Installs the global subscriber. `log` records from the core crate are
/// bridged into it. Returns the session log file when one was created.
pub fn init_logging(config: &LogConfig) -> Result<Option<PathBuf>> {
    let filter = build_filter(config.level);

    match config.target {
        LogTarget::Stderr => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(config.is_debug)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
            Ok(None)
        }
        LogTarget::SessionFile => {
            let Some(root) = logs_dir() else {
                // Nowhere to write; stay silent rather than corrupting the TUI
                return Ok(None);
            };
            let (path, file) = create_session_log_file(&root)?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
            Ok(Some(path))
        }
    }
}

fn parse_log_timestamp(file_name: &str) -> Option<chrono::NaiveDateTime> {
    let stem = file_name.strip_suffix(".log")?;
    chrono::NaiveDateTime::parse_from_str(stem, LOG_FILE_TIMESTAMP).ok()
}

/// Removes the oldest session log files beyond `max_files`.
async fn do_cleanup_log_files(logs_root: &Path, max_files: usize) -> std::io::Result<usize> {
    let mut entries = tokio::fs::read_dir(logs_root).await?;
    let mut log_files: Vec<String> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if parse_log_timestamp(&name).is_some() {
            log_files.push(name);
        }
    }

    if log_files.len() <= max_files {
        return Ok(0);
    }

    log_files.sort();
    let excess_count = log_files.len() - max_files;
    let mut removed = 0;

    for name in log_files.into_iter().take(excess_count) {
        match tokio::fs::remove_file(logs_root.join(&name)).await {
            Ok(_) => {
                tracing::debug!("Removed old log file: {}", name);
                removed += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to remove log file {}: {}", name, e);
            }
        }
    }

    Ok(removed)
}

pub fn spawn_log_cleanup_task() {
    tokio::spawn(async {
        let Some(root) = logs_dir() else {
            return;
        };
        match do_cleanup_log_files(&root, MAX_LOG_FILES).await {
            Ok(0) => {}
            Ok(n) => tracing::info!("Cleaned up {} old log file(s)", n),
            Err(e) => tracing::warn!("Failed to cleanup old log files: {}", e),
        }
    });
}
