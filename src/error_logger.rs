/// 丢弃样本记录器 - 将缺少 init/finish 的操作及其原始记录写入文件
use crate::error::{Error, ExportError, Result};
use crate::report::Discarded;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 丢弃统计
#[derive(Debug, Default)]
pub struct DiscardMetrics {
    /// 总数
    pub total: usize,
    /// 按原因统计
    pub by_reason: BTreeMap<&'static str, usize>,
}

#[derive(Debug)]
pub struct ErrorLogger {
    writer: BufWriter<File>,
    path: PathBuf,
    metrics: DiscardMetrics,
    summary_path: PathBuf,
}

impl ErrorLogger {
    /// 创建记录器（追加模式）
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Export(ExportError::FileCreateFailed {
                        path: parent.to_path_buf(),
                        reason: e.to_string(),
                    })
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::Export(ExportError::FileCreateFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;

        debug!("Discard log opened: {}", path.display());

        let mut summary = path.as_os_str().to_owned();
        summary.push(".summary.txt");

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            metrics: DiscardMetrics::default(),
            summary_path: PathBuf::from(summary),
        })
    }

    /// 记录一个被丢弃的样本（opid | 原因 | 全部记录）
    pub fn log_discarded(&mut self, fn_tag: &str, discarded: &Discarded) -> Result<()> {
        let rows: Vec<String> = discarded.rows.iter().map(ToString::to_string).collect();
        writeln!(
            self.writer,
            "{} | {} | {} | [{}]",
            fn_tag,
            discarded.opid,
            discarded.reason(),
            rows.join(", ")
        )
        .map_err(|e| {
            Error::Export(ExportError::FileWriteFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        })?;

        self.metrics.total += 1;
        *self
            .metrics
            .by_reason
            .entry(discarded.reason())
            .or_insert(0) += 1;
        Ok(())
    }

    /// 已记录的数量
    pub fn count(&self) -> usize {
        self.metrics.total
    }

    /// 刷新缓冲区并写入 summary
    pub fn finalize(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| {
            Error::Export(ExportError::FileWriteFailed {
                path: self.path.clone(),
                reason: format!("Flush failed: {e}"),
            })
        })?;

        let mut summary = format!("total: {}\n", self.metrics.total);
        for (reason, n) in &self.metrics.by_reason {
            summary.push_str(&format!("{reason}: {n}\n"));
        }

        fs::write(&self.summary_path, summary).map_err(|e| {
            Error::Export(ExportError::FileWriteFailed {
                path: self.summary_path.clone(),
                reason: e.to_string(),
            })
        })?;

        if self.metrics.total > 0 {
            info!(
                "Discarded samples written: {} ({} records, {:?})",
                self.path.display(),
                self.metrics.total,
                self.metrics.by_reason
            );
        } else {
            debug!(
                "No discarded samples (summary still generated) {}",
                self.summary_path.display()
            );
        }
        Ok(())
    }

    /// 获取 summary 路径（便于测试）
    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }
}
