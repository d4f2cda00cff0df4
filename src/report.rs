//! 报告生成
//!
//! 流程：按函数标签选出 opid → 逐个读取状态记录 → 配对 init/finish 计算耗时
//! → 可选按耗时排序。不完整的样本会被丢弃并记录诊断信息，不会中断运行。
use crate::db::PerfDb;
use crate::error::{Error, ReportError, Result};
use crate::model::{EventRecord, OpId, StateType};
use log::{debug, info, warn};
use std::fmt;

/// 样本排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// 保持 opid 的选取顺序
    #[default]
    Selection,
    /// 按耗时升序（稳定排序）
    Duration,
}

/// 单次报告的运行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// 函数标签（SQL LIKE 模式）
    pub fn_tag: String,
    /// 最多选取的 opid 数量，`None` 表示不限制
    pub limit: Option<u32>,
    /// opid 下界
    pub start_opid: i64,
    pub sort: SortOrder,
}

impl ReportConfig {
    pub fn new(fn_tag: impl Into<String>) -> Self {
        Self {
            fn_tag: fn_tag.into(),
            limit: None,
            start_opid: 0,
            sort: SortOrder::Selection,
        }
    }
}

/// 一个完整操作的耗时样本
#[derive(Debug, Clone, PartialEq)]
pub struct OpSample {
    pub opid: OpId,
    pub start_time: i64,
    pub finish_time: i64,
    /// 微秒
    pub duration: i64,
}

/// 缺少 init 或 finish 的操作
#[derive(Debug, Clone, PartialEq)]
pub struct Discarded {
    pub opid: OpId,
    pub missing_init: bool,
    pub missing_finish: bool,
    /// 扫描过的全部记录
    pub rows: Vec<EventRecord>,
}

impl Discarded {
    /// 丢弃原因
    pub fn reason(&self) -> &'static str {
        match (self.missing_init, self.missing_finish) {
            (true, true) => "missing init and finish",
            (true, false) => "missing init",
            _ => "missing finish",
        }
    }
}

impl fmt::Display for Discarded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opid {} ({}): [", self.opid, self.reason())?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{row}")?;
        }
        f.write_str("]")
    }
}

/// 从一个 opid 的全部记录中提取样本
///
/// 多条 init 取最早的时间，多条 finish 取最晚的时间。
pub fn extract_sample(
    opid: OpId,
    rows: Vec<EventRecord>,
) -> std::result::Result<OpSample, Discarded> {
    let mut init: Option<i64> = None;
    let mut finish: Option<i64> = None;

    for row in &rows {
        match row.state_type {
            StateType::Init => init = Some(init.map_or(row.time, |t| t.min(row.time))),
            StateType::Finish => finish = Some(finish.map_or(row.time, |t| t.max(row.time))),
            StateType::Other(_) => {}
        }
    }

    match (init, finish) {
        (Some(start_time), Some(finish_time)) => Ok(OpSample {
            opid,
            start_time,
            finish_time,
            duration: finish_time - start_time,
        }),
        _ => Err(Discarded {
            opid,
            missing_init: init.is_none(),
            missing_finish: finish.is_none(),
            rows,
        }),
    }
}

/// 一次运行的报告
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    fn_tag: String,
    samples: Vec<OpSample>,
    discarded: Vec<Discarded>,
}

impl Report {
    pub fn new(fn_tag: impl Into<String>, samples: Vec<OpSample>, discarded: Vec<Discarded>) -> Self {
        Self {
            fn_tag: fn_tag.into(),
            samples,
            discarded,
        }
    }

    pub fn fn_tag(&self) -> &str {
        &self.fn_tag
    }

    pub fn samples(&self) -> &[OpSample] {
        &self.samples
    }

    pub fn discarded(&self) -> &[Discarded] {
        &self.discarded
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn min_duration(&self) -> Option<i64> {
        self.samples.iter().map(|s| s.duration).min()
    }

    pub fn max_duration(&self) -> Option<i64> {
        self.samples.iter().map(|s| s.duration).max()
    }

    /// 重新排序样本
    pub fn sort(&mut self, order: SortOrder) {
        if order == SortOrder::Duration {
            self.samples.sort_by_key(|s| s.duration);
        }
    }
}

/// 从数据库生成报告
///
/// 没有任何 opid 匹配时返回 [`ReportError::NoMatchingOperations`]。
pub fn generate(db: &PerfDb, config: &ReportConfig) -> Result<Report> {
    let opids = db.select_opids(&config.fn_tag, config.limit, config.start_opid)?;
    if opids.is_empty() {
        return Err(Error::Report(ReportError::NoMatchingOperations {
            fn_tag: config.fn_tag.clone(),
        }));
    }
    info!("Found {} operation(s) for {}", opids.len(), config.fn_tag);

    let mut samples = Vec::with_capacity(opids.len());
    let mut discarded = Vec::new();
    for opid in opids {
        let rows = db.fetch_states(&opid)?;
        match extract_sample(opid, rows) {
            Ok(sample) => {
                debug!("opid {} took {} us to complete", sample.opid, sample.duration);
                if sample.duration < 0 {
                    warn!(
                        "opid {} finished before it started ({} us)",
                        sample.opid, sample.duration
                    );
                }
                samples.push(sample);
            }
            Err(d) => {
                warn!("incomplete states, discarding this sample, {d}");
                discarded.push(d);
            }
        }
    }

    let mut report = Report::new(config.fn_tag.clone(), samples, discarded);
    report.sort(config.sort);
    Ok(report)
}
