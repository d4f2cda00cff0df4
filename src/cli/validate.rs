use log::info;

use cortxfs_hist::config::Config;
use cortxfs_hist::db::PerfDb;
use cortxfs_hist::error::Result;

/// 验证配置文件并检查数据库结构
pub fn handle_validate(cfg: &Config) -> Result<()> {
    info!("Database: {}", cfg.database.path());
    info!(
        "Report: rec_limit {}, start_opid {}, sort_by_time {}",
        cfg.report.rec_limit, cfg.report.start_opid, cfg.report.sort_by_time
    );
    info!(
        "Chart: {} ({}x{})",
        cfg.report.op_graph, cfg.chart.width, cfg.chart.height
    );
    if let Some(csv) = &cfg.report.csv {
        info!("CSV export: {csv}");
    }
    info!("Log file: {} (level {})", cfg.logging.file(), cfg.logging.level());
    info!("Discard log: {}", cfg.error.file());

    let db = PerfDb::open(cfg.database.path())?;
    info!("Database schema OK: {}", db.path().display());

    Ok(())
}
