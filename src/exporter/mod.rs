/// Exporter 模块 - 负责把报告输出到各种目标
///
/// 支持的导出目标:
/// - SVG 柱状图（始终启用）
/// - CSV 样本文件（feature = "csv"，需配置路径）
use crate::config::Config;
use crate::error::Result;
use crate::report::Report;
use log::info;

mod chart;
#[cfg(feature = "csv")]
mod csv;
mod util;

pub use chart::{ChartExporter, bar_labels};
#[cfg(feature = "csv")]
pub use csv::CsvExporter;

/// 导出器 trait
pub trait Exporter {
    /// 初始化导出器 (例如:创建父目录)
    fn initialize(&mut self) -> Result<()>;

    /// 导出报告
    fn export(&mut self, report: &Report) -> Result<()>;

    /// 完成导出 (例如:刷新缓冲区、关闭文件)
    fn finalize(&mut self) -> Result<()> {
        Ok(())
    }

    /// 获取导出器名称 (用于日志记录)
    fn name(&self) -> &str;

    /// 获取导出统计信息的快照
    fn stats_snapshot(&self) -> Option<ExportStats> {
        None
    }
}

/// 导出统计信息
#[derive(Debug, Default, Clone)]
pub struct ExportStats {
    /// 写出的样本数
    pub exported: usize,
    /// 输出文件
    pub output: String,
}

/// 导出器管理器 - 依次驱动图表与可选的 CSV 导出器
pub struct ExporterManager {
    exporters: Vec<Box<dyn Exporter>>,
}

impl std::fmt::Debug for ExporterManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExporterManager")
            .field("exporters", &self.names())
            .finish()
    }
}

impl ExporterManager {
    /// 从配置创建导出器管理器
    pub fn from_config(config: &Config) -> Self {
        let mut exporters: Vec<Box<dyn Exporter>> = Vec::with_capacity(2);

        exporters.push(Box::new(ChartExporter::from_config(
            &config.report.op_graph,
            &config.chart,
        )));
        info!("Using chart exporter: {}", config.report.op_graph);

        #[cfg(feature = "csv")]
        if let Some(path) = &config.report.csv {
            exporters.push(Box::new(CsvExporter::new(path)));
            info!("Using CSV exporter: {path}");
        }

        #[cfg(not(feature = "csv"))]
        if let Some(path) = &config.report.csv {
            log::warn!("CSV export to {path} requested but the csv feature is disabled");
        }

        Self { exporters }
    }

    /// 导出器名称列表
    pub fn names(&self) -> Vec<&str> {
        self.exporters.iter().map(|e| e.name()).collect()
    }

    /// 初始化、导出、完成
    pub fn export(&mut self, report: &Report) -> Result<()> {
        for exporter in &mut self.exporters {
            exporter.initialize()?;
            exporter.export(report)?;
            exporter.finalize()?;
        }
        Ok(())
    }

    /// 记录导出器的统计信息到日志
    pub fn log_stats(&self) {
        for exporter in &self.exporters {
            if let Some(s) = exporter.stats_snapshot() {
                info!(
                    "Export stats: {} => {} sample(s) -> {}",
                    exporter.name(),
                    s.exported,
                    s.output
                );
            }
        }
    }
}
