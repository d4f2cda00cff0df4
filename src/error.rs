use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration related error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File operation error
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Report generation error
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Export error
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Configuration file parse failed
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    /// Invalid log level
    #[error("Invalid log level '{level}', valid values: {}", valid_levels.join(", "))]
    InvalidLogLevel {
        level: String,
        valid_levels: Vec<String>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value {field} = '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// File already exists
    #[error("File already exists: {path} (use --force to replace)")]
    AlreadyExists { path: PathBuf },

    /// File write failed
    #[error("Failed to write file {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Create directory failed
    #[error("Failed to create directory {path}: {reason}")]
    CreateDirectoryFailed { path: PathBuf, reason: String },
}

/// 数据库错误
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Database file could not be opened
    #[error("Failed to open database {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// Required table is absent
    #[error("Table '{table}' not found in {path}")]
    MissingTable { path: PathBuf, table: String },

    /// Query failed
    #[error("Query failed ({context}): {source}")]
    QueryFailed {
        context: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// 报告生成错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// No operation matched the function tag
    #[error("Could not find enough details in db for {fn_tag}")]
    NoMatchingOperations { fn_tag: String },

    /// Operations matched but none had both init and finish rows
    #[error("No complete init/finish samples for {fn_tag} ({discarded} discarded)")]
    NoCompleteSamples { fn_tag: String, discarded: usize },
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// Chart rendering failed
    #[error("Failed to render chart {path}: {reason}")]
    RenderFailed { path: PathBuf, reason: String },

    /// CSV export failed
    #[error("CSV export failed {path}: {reason}")]
    CsvExportFailed { path: PathBuf, reason: String },

    /// Failed to create output file
    #[error("Failed to create output file {path}: {reason}")]
    FileCreateFailed { path: PathBuf, reason: String },

    /// Failed to write file
    #[error("Failed to write file {path}: {reason}")]
    FileWriteFailed { path: PathBuf, reason: String },
}

/// 应用程序 Result 类型别名
pub type Result<T> = std::result::Result<T, Error>;

// 辅助宏，用于快速创建错误
#[macro_export]
macro_rules! config_error {
    ($variant:ident { $($field:ident: $value:expr),+ $(,)? }) => {
        $crate::error::Error::Config($crate::error::ConfigError::$variant {
            $($field: $value),+
        })
    };
}

#[macro_export]
macro_rules! file_error {
    ($variant:ident { $($field:ident: $value:expr),+ $(,)? }) => {
        $crate::error::Error::File($crate::error::FileError::$variant {
            $($field: $value),+
        })
    };
}

#[macro_export]
macro_rules! database_error {
    ($variant:ident { $($field:ident: $value:expr),+ $(,)? }) => {
        $crate::error::Error::Database($crate::error::DatabaseError::$variant {
            $($field: $value),+
        })
    };
}

#[macro_export]
macro_rules! export_error {
    ($variant:ident { $($field:ident: $value:expr),+ $(,)? }) => {
        $crate::error::Error::Export($crate::error::ExportError::$variant {
            $($field: $value),+
        })
    };
}
