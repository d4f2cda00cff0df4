use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_OP_GRAPH, DEFAULT_REC_LIMIT, LOG_LEVELS, NO_LIMIT,
};
use crate::error::{ConfigError, Error, Result};
use crate::report::SortOrder;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub error: ErrorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::Config(ConfigError::NotFound(path.to_path_buf())))?;
        Self::from_str(&content, path.to_path_buf())
    }

    /// 从字符串解析配置
    pub fn from_str(content: &str, path: PathBuf) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            Error::Config(ConfigError::ParseFailed {
                path,
                reason: e.to_string(),
            })
        })?;

        config.validate()?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;
        self.report.validate()?;
        self.chart.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Path cannot be empty".to_string(),
        }));
    }
    Ok(())
}

/// 性能数据库配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DB_PATH.to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn validate(&self) -> Result<()> {
        non_empty("database.path", &self.path)
    }
}

/// 报告默认参数，命令行参数优先
#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    /// 最多选取的 opid 数量，"NA" 表示不限制
    #[serde(default = "default_rec_limit")]
    pub rec_limit: String,
    #[serde(default)]
    pub start_opid: i64,
    #[serde(default)]
    pub sort_by_time: bool,
    /// 输出图表路径
    #[serde(default = "default_op_graph")]
    pub op_graph: String,
    /// 样本 CSV 导出路径（可选）
    #[serde(default)]
    pub csv: Option<String>,
}

fn default_rec_limit() -> String {
    DEFAULT_REC_LIMIT.to_string()
}

fn default_op_graph() -> String {
    DEFAULT_OP_GRAPH.to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            rec_limit: default_rec_limit(),
            start_opid: 0,
            sort_by_time: false,
            op_graph: default_op_graph(),
            csv: None,
        }
    }
}

impl ReportSettings {
    /// 解析后的记录上限
    pub fn limit(&self) -> Result<Option<u32>> {
        parse_rec_limit(&self.rec_limit).map_err(|reason| {
            Error::Config(ConfigError::InvalidValue {
                field: "report.rec_limit".to_string(),
                value: self.rec_limit.clone(),
                reason,
            })
        })
    }

    pub fn sort_order(&self) -> SortOrder {
        if self.sort_by_time {
            SortOrder::Duration
        } else {
            SortOrder::Selection
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.limit()?;
        non_empty("report.op_graph", &self.op_graph)?;
        if let Some(csv) = &self.csv {
            non_empty("report.csv", csv)?;
        }
        Ok(())
    }
}

/// 解析记录上限："NA" 表示不限制，否则为正整数
pub fn parse_rec_limit(value: &str) -> std::result::Result<Option<u32>, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(NO_LIMIT) {
        return Ok(None);
    }
    match value.parse::<u32>() {
        Ok(0) => Err("limit must be greater than 0, use 'NA' for no limit".to_string()),
        Ok(n) => Ok(Some(n)),
        Err(e) => Err(format!("expected a number or '{NO_LIMIT}': {e}")),
    }
}

/// 图表外观
#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// x 轴 opid 标签字号
    #[serde(default = "default_tick_font_size")]
    pub tick_font_size: u32,
    /// 柱顶耗时标签字号
    #[serde(default = "default_label_font_size")]
    pub label_font_size: u32,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_tick_font_size() -> u32 {
    9
}

fn default_label_font_size() -> u32 {
    9
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            tick_font_size: default_tick_font_size(),
            label_font_size: default_label_font_size(),
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value, min) in [
            ("chart.width", self.width, 200),
            ("chart.height", self.height, 150),
            ("chart.tick_font_size", self.tick_font_size, 1),
            ("chart.label_font_size", self.label_font_size, 1),
        ] {
            if value < min {
                return Err(Error::Config(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: format!("must be at least {min}"),
                }));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ErrorConfig {
    /// 丢弃样本的记录文件
    pub file: String,
}

impl ErrorConfig {
    pub fn file(&self) -> &str {
        &self.file
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            file: "logs/discarded.log".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// 应用日志输出文件路径
    pub file: String,
    pub level: String,
}

impl LoggingConfig {
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    /// 验证日志级别是否有效
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS
            .iter()
            .any(|&l| l.eq_ignore_ascii_case(self.level.as_str()))
        {
            return Err(Error::Config(ConfigError::InvalidLogLevel {
                level: self.level.clone(),
                valid_levels: LOG_LEVELS.iter().map(ToString::to_string).collect(),
            }));
        }
        non_empty("logging.file", &self.file)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "logs/cortxfs-hist.log".to_string(),
            level: "info".to_string(),
        }
    }
}
