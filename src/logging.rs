use crate::config::LoggingConfig;
use crate::constants::LOG_LEVELS;
use crate::error::{ConfigError, Error, FileError, Result};
use log::SetLoggerError;
use log::{LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

// 使用 once_cell 缓存日志级别映射表，避免每次查找时重新构建
static LOG_LEVEL_MAP: Lazy<HashMap<&'static str, LevelFilter>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("trace", LevelFilter::Trace);
    map.insert("debug", LevelFilter::Debug);
    map.insert("info", LevelFilter::Info);
    map.insert("warn", LevelFilter::Warn);
    map.insert("error", LevelFilter::Error);
    map
});

/// 写入 stderr 与日志文件的简单 Logger
struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let msg = format!(
            "[{}] {} - {}\n",
            record.level(),
            record.target(),
            record.args()
        );

        let _ = std::io::stderr().write_all(msg.as_bytes());

        if let Ok(mut f) = self.file.lock() {
            let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = write!(f, "{ts} {msg}");
        }
    }

    fn flush(&self) {
        if let Ok(mut f) = self.file.lock() {
            let _ = f.flush();
        }
    }
}

/// 初始化日志系统
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;

    let log_path = Path::new(&config.file);
    if let Some(parent_dir) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent_dir.exists() {
            std::fs::create_dir_all(parent_dir).map_err(|e| {
                Error::File(FileError::CreateDirectoryFailed {
                    path: parent_dir.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| {
            Error::File(FileError::WriteFailed {
                path: log_path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

    let logger = FileLogger {
        level,
        file: Mutex::new(file),
    };

    log::set_max_level(level);
    log::set_boxed_logger(Box::new(logger)).map_err(|e: SetLoggerError| {
        Error::File(FileError::WriteFailed {
            path: log_path.to_path_buf(),
            reason: format!("Failed to install logger: {e}"),
        })
    })?;

    log::debug!(
        "Logging initialized - level: {:?}, file: {}",
        level,
        config.file
    );

    Ok(())
}

/// 命令行 -v / -q 覆盖日志级别
pub fn override_level(config: &mut LoggingConfig, verbose: bool, quiet: bool) {
    if verbose {
        config.level = "debug".to_string();
    } else if quiet {
        config.level = "error".to_string();
    }
}

/// 解析日志级别字符串
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    let lower = level_str.to_lowercase();
    LOG_LEVEL_MAP.get(lower.as_str()).copied().ok_or_else(|| {
        Error::Config(ConfigError::InvalidLogLevel {
            level: level_str.to_string(),
            valid_levels: LOG_LEVELS.iter().map(ToString::to_string).collect(),
        })
    })
}
