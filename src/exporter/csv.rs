use super::util::ensure_parent_dir;
use super::{ExportStats, Exporter};
use crate::error::{Error, ExportError, Result};
use crate::report::Report;
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};

const CSV_HEADER: [&str; 4] = ["opid", "start_time", "finish_time", "duration_us"];

/// CSV 导出器 - 按报告顺序写出每个样本
#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    stats: ExportStats,
}

impl CsvExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            stats: ExportStats {
                exported: 0,
                output: path.display().to_string(),
            },
            path,
            writer: None,
        }
    }

    fn failed(&self, reason: impl ToString) -> Error {
        Error::Export(ExportError::CsvExportFailed {
            path: self.path.clone(),
            reason: reason.to_string(),
        })
    }
}

impl Exporter for CsvExporter {
    fn initialize(&mut self) -> Result<()> {
        ensure_parent_dir(&self.path).map_err(|e| {
            Error::Export(ExportError::FileCreateFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        })?;
        let writer = csv::Writer::from_path(&self.path).map_err(|e| {
            Error::Export(ExportError::FileCreateFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        })?;
        self.writer = Some(writer);
        debug!("CSV exporter initialized: {}", self.path.display());
        Ok(())
    }

    fn export(&mut self, report: &Report) -> Result<()> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| self.failed("CSV exporter not initialized"))?;

        writer
            .write_record(CSV_HEADER)
            .map_err(|e| self.failed(e))?;
        for s in report.samples() {
            writer
                .write_record([
                    s.opid.to_string(),
                    s.start_time.to_string(),
                    s.finish_time.to_string(),
                    s.duration.to_string(),
                ])
                .map_err(|e| self.failed(e))?;
            self.stats.exported += 1;
        }

        self.writer = Some(writer);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                Error::Export(ExportError::FileWriteFailed {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            })?;
            info!(
                "CSV written: {} ({} samples)",
                self.path.display(),
                self.stats.exported
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "CSV"
    }

    fn stats_snapshot(&self) -> Option<ExportStats> {
        Some(self.stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OpId;
    use crate::report::OpSample;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_csv_rows_follow_report_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("samples/out.csv");
        let report = Report::new(
            "fsal_read",
            vec![
                OpSample {
                    opid: OpId::Int(9),
                    start_time: 100,
                    finish_time: 250,
                    duration: 150,
                },
                OpSample {
                    opid: OpId::from("op-2"),
                    start_time: 10,
                    finish_time: 15,
                    duration: 5,
                },
            ],
            Vec::new(),
        );

        let mut exporter = CsvExporter::new(&path);
        exporter.initialize().unwrap();
        exporter.export(&report).unwrap();
        exporter.finalize().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "opid,start_time,finish_time,duration_us\n9,100,250,150\nop-2,10,15,5\n"
        );
        assert_eq!(exporter.stats_snapshot().unwrap().exported, 2);
    }

    #[test]
    fn test_export_before_initialize_fails() {
        let dir = TempDir::new().unwrap();
        let mut exporter = CsvExporter::new(dir.path().join("x.csv"));
        let report = Report::new("t", Vec::new(), Vec::new());
        assert!(exporter.export(&report).is_err());
    }
}
