use cortxfs_hist::config::Config;
use cortxfs_hist::db::PerfDb;
use cortxfs_hist::error::{Error, ReportError, Result};
use cortxfs_hist::error_logger::ErrorLogger;
use cortxfs_hist::exporter::ExporterManager;
use cortxfs_hist::report::{self, ReportConfig, SortOrder};
use log::info;
use std::time::Instant;

/// 生成一个函数标签的执行时间柱状图
pub fn handle_run(cfg: &Config, report_cfg: &ReportConfig) -> Result<()> {
    let total_start = Instant::now();

    info!(
        "Creating cortxfs histogram graph for fn_tag {}, opid max limit {}, from start opid {}, from db file {}, time sort {}, o/p graph file {}",
        report_cfg.fn_tag,
        report_cfg
            .limit
            .map_or_else(|| "none".to_string(), |l| l.to_string()),
        report_cfg.start_opid,
        cfg.database.path(),
        if report_cfg.sort == SortOrder::Duration {
            "yes"
        } else {
            "no"
        },
        cfg.report.op_graph
    );

    // 第一步：打开性能数据库
    let db = PerfDb::open(cfg.database.path())?;

    // 第二步：提取样本
    let report = report::generate(&db, report_cfg)?;

    // 第三步：记录被丢弃的样本
    let mut error_logger = ErrorLogger::new(cfg.error.file())?;
    for discarded in report.discarded() {
        error_logger.log_discarded(report.fn_tag(), discarded)?;
    }
    error_logger.finalize()?;

    if report.is_empty() {
        return Err(Error::Report(ReportError::NoCompleteSamples {
            fn_tag: report_cfg.fn_tag.clone(),
            discarded: error_logger.count(),
        }));
    }

    // 第四步：渲染图表并导出
    let mut exporter_manager = ExporterManager::from_config(cfg);
    exporter_manager.export(&report)?;
    exporter_manager.log_stats();

    let elapsed = total_start.elapsed().as_secs_f64();

    eprintln!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("  fn_tag:     {}", report.fn_tag());
    eprintln!("  Samples:    {}", report.samples().len());
    eprintln!("  Discarded:  {}", error_logger.count());
    if let (Some(min), Some(max)) = (report.min_duration(), report.max_duration()) {
        eprintln!("  Duration:   {min} .. {max} us");
    }
    eprintln!("  Output:     {}", exporter_manager.names().join(", "));
    eprintln!("  Elapsed:    {elapsed:.3} seconds");
    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!(
        "Histogram graph render completed for operation {}",
        report.fn_tag()
    );

    Ok(())
}
